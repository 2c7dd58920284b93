//! Overlay drawing for one processed frame.

use crate::draw::{
    Rgb, draw_filled_circle, draw_line, draw_rect, draw_text, draw_thick_line, fill_rect,
    resize_nearest,
};
use crate::mapper::GestureReading;
use handvol_base::{Tensor, Vec2};
use handvol_infer::{HAND_CONNECTIONS, HandLandmarks};

pub const DISPLAY_WIDTH: usize = 640;
pub const DISPLAY_HEIGHT: usize = 480;

const SKELETON_COLOR: Rgb = [224, 224, 224];
const LANDMARK_COLOR: Rgb = [255, 0, 0];
const LANDMARK_RADIUS: i32 = 3;
const PINCH_COLOR: Rgb = [255, 0, 255];
const FINGERTIP_RADIUS: i32 = 15;
const PINCH_THICKNESS: i32 = 3;
const BAR_COLOR: Rgb = [0, 255, 0];
const BAR_LEFT: i32 = 50;
const BAR_RIGHT: i32 = 85;
const BAR_TOP: i32 = 150;
const BAR_BOTTOM: i32 = 400;
const BAR_THICKNESS: i32 = 3;
const LABEL_COLOR: Rgb = [0, 0, 255];
const LABEL_ORIGIN: Vec2<i32> = Vec2::new(40, 450);
const LABEL_SCALE: i32 = 4;

/// A detected hand together with what the mapper made of it.
#[derive(Debug, Clone, PartialEq)]
pub struct HandOverlay {
    pub hand: HandLandmarks,
    pub reading: GestureReading,
}

/// Text shown under the bar. The value is the raw pinch distance.
pub fn volume_label(distance: f32) -> String {
    format!("Vol: {}%", distance as i32)
}

/// Draw every overlay onto `frame` and scale the result for display.
///
/// Without overlays the frame comes back unmodified (apart from the resize,
/// which is a no-op for 640x480 input).
pub fn render(mut frame: Tensor<u8>, overlays: &[HandOverlay]) -> Tensor<u8> {
    let (width, height) = (frame.width(), frame.height());
    if frame.channels() == 3 {
        for overlay in overlays {
            draw_overlay(&mut frame.data, width, height, overlay);
        }
    }
    resize_nearest(frame, DISPLAY_WIDTH, DISPLAY_HEIGHT)
}

pub fn draw_overlay(buf: &mut [u8], width: usize, height: usize, overlay: &HandOverlay) {
    draw_hand(buf, width, height, &overlay.hand);

    let GestureReading {
        thumb,
        index,
        distance,
        bar_top,
        ..
    } = overlay.reading;

    draw_filled_circle(buf, width, height, thumb, FINGERTIP_RADIUS, PINCH_COLOR);
    draw_filled_circle(buf, width, height, index, FINGERTIP_RADIUS, PINCH_COLOR);
    draw_thick_line(buf, width, height, thumb, index, PINCH_THICKNESS, PINCH_COLOR);

    draw_rect(
        buf,
        width,
        height,
        Vec2::new(BAR_LEFT, BAR_TOP),
        Vec2::new(BAR_RIGHT, BAR_BOTTOM),
        BAR_THICKNESS,
        BAR_COLOR,
    );
    fill_rect(
        buf,
        width,
        height,
        Vec2::new(BAR_LEFT, bar_top as i32),
        Vec2::new(BAR_RIGHT, BAR_BOTTOM),
        BAR_COLOR,
    );

    draw_text(
        buf,
        width,
        height,
        LABEL_ORIGIN,
        &volume_label(distance),
        LABEL_SCALE,
        LABEL_COLOR,
    );
}

/// Landmark skeleton: connections first, dots on top.
pub fn draw_hand(buf: &mut [u8], width: usize, height: usize, hand: &HandLandmarks) {
    for (a, b) in HAND_CONNECTIONS {
        draw_line(
            buf,
            width,
            height,
            hand.pixel(a, width, height),
            hand.pixel(b, width, height),
            SKELETON_COLOR,
        );
    }

    for landmark in &hand.landmarks {
        draw_filled_circle(
            buf,
            width,
            height,
            landmark.to_pixel(width, height),
            LANDMARK_RADIUS,
            LANDMARK_COLOR,
        );
    }
}
