use crate::InferError;
use handvol_base::{Tensor, Vec2};
use std::f32::consts::{PI, TAU};

use super::palm::PalmDetection;
use super::preprocess::{InputLayout, check_frame};

/// Palm box side is scaled by this to cover the whole hand.
const ROI_SCALE: f32 = 2.6;
/// Shift toward the fingers, as a fraction of the palm box height.
const ROI_SHIFT_Y: f32 = -0.5;

/// Square, rotated hand region in frame pixels.
///
/// `rotation` turns the crop so the wrist-to-middle-finger direction points
/// up in the landmark model input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandRoi {
    pub center: Vec2<f32>,
    pub size: f32,
    pub rotation: f32,
}

fn normalize_angle(angle: f32) -> f32 {
    angle - TAU * ((angle + PI) / TAU).floor()
}

impl HandRoi {
    pub fn from_palm(palm: &PalmDetection) -> Self {
        let wrist = palm.wrist();
        let middle = palm.middle_mcp();
        let rotation =
            normalize_angle(PI / 2.0 - (-(middle.y - wrist.y)).atan2(middle.x - wrist.x));

        let (sin, cos) = rotation.sin_cos();
        let (w, h) = (palm.bbox.size.x, palm.bbox.size.y);
        let box_center = palm.bbox.origin + palm.bbox.size * 0.5;
        let center = Vec2::new(
            box_center.x - h * ROI_SHIFT_Y * sin,
            box_center.y + h * ROI_SHIFT_Y * cos,
        );

        Self {
            center,
            size: w.max(h) * ROI_SCALE,
            rotation,
        }
    }

    /// Map a point in `input_size` crop pixels back to frame pixels.
    pub fn to_frame(&self, point: Vec2<f32>, input_size: usize) -> Vec2<f32> {
        let side = input_size as f32;
        let local = Vec2::new(point.x / side - 0.5, point.y / side - 0.5) * self.size;
        let (sin, cos) = self.rotation.sin_cos();
        Vec2::new(
            self.center.x + local.x * cos - local.y * sin,
            self.center.y + local.x * sin + local.y * cos,
        )
    }

    /// Crop the region out of `frame` into a `size` x `size` model input,
    /// rotated upright, nearest neighbour, black outside the frame, scaled to
    /// `[0.0, 1.0]`.
    pub fn crop(
        &self,
        frame: &Tensor<u8>,
        size: usize,
        layout: InputLayout,
    ) -> Result<Tensor<f32>, InferError> {
        let (w, h) = check_frame(frame)?;
        let mut data = vec![0.0f32; 3 * size * size];

        for y in 0..size {
            for x in 0..size {
                let src = self.to_frame(Vec2::new(x as f32 + 0.5, y as f32 + 0.5), size);
                let (sx, sy) = (src.x.floor(), src.y.floor());
                if !(sx >= 0.0 && sy >= 0.0 && sx < w as f32 && sy < h as f32) {
                    continue;
                }
                let base = (sy as usize * w + sx as usize) * 3;
                for ch in 0..3 {
                    data[layout.index(size, x, y, ch)] = frame.data[base + ch] as f32 / 255.0;
                }
            }
        }

        Ok(Tensor::new(layout.shape(size), data)?)
    }
}
