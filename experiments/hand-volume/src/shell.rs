//! Window, layout and the timer-driven run loop.

use crate::draw::{Rgb, blit, draw_rect, draw_text, fill_rect, rgb_to_argb, text_size};
use crate::error::AppError;
use crate::pipeline::{Pipeline, TickOutcome};
use crate::render::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use handvol_base::{Rect, Tensor, Vec2};
use handvol_camera::Camera;
use handvol_infer::LandmarkDetector;
use handvol_volume::VolumeSink;
use log::{debug, info};
use minifb::{Key, MouseButton, MouseMode, Window, WindowOptions};
use std::time::Duration;

pub const WINDOW_TITLE: &str = "Hand Gesture Volume Control";
pub const WINDOW_WIDTH: usize = 800;
pub const WINDOW_HEIGHT: usize = 600;

const IMAGE_TOP: i32 = 20;
const BUTTON_GAP: i32 = 20;
const BUTTON_SIZE: Vec2<i32> = Vec2::new(120, 40);
const BUTTON_LABEL: &str = "Exit";
const BUTTON_LABEL_SCALE: i32 = 4;
const BACKGROUND: Rgb = [240, 240, 240];
const BUTTON_FACE: Rgb = [210, 210, 210];
const BUTTON_BORDER: Rgb = [90, 90, 90];
const BUTTON_TEXT: Rgb = [0, 0, 0];

/// Where the image area and the Exit button sit inside the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub image: Rect<i32>,
    pub exit_button: Rect<i32>,
}

impl Default for Layout {
    fn default() -> Self {
        let image = Rect::new(
            Vec2::new((WINDOW_WIDTH - DISPLAY_WIDTH) as i32 / 2, IMAGE_TOP),
            Vec2::new(DISPLAY_WIDTH as i32, DISPLAY_HEIGHT as i32),
        );
        let exit_button = Rect::new(
            Vec2::new(
                (WINDOW_WIDTH as i32 - BUTTON_SIZE.x) / 2,
                image.max().y + BUTTON_GAP,
            ),
            BUTTON_SIZE,
        );
        Self { image, exit_button }
    }
}

impl Layout {
    pub fn hits_exit(&self, x: f32, y: f32) -> bool {
        self.exit_button
            .contains_point(Vec2::new(x.floor() as i32, y.floor() as i32))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    Running,
    Stopped,
}

/// Ways the user can end the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    ExitButton,
    WindowClosed,
    EscapePressed,
}

/// Shell state plus the window framebuffer.
pub struct Shell {
    layout: Layout,
    state: ShellState,
    canvas: Vec<u8>,
    mouse_was_down: bool,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new(Layout::default())
    }
}

impl Shell {
    pub fn new(layout: Layout) -> Self {
        let mut shell = Self {
            layout,
            state: ShellState::Running,
            canvas: vec![0; WINDOW_WIDTH * WINDOW_HEIGHT * 3],
            mouse_was_down: false,
        };
        shell.draw_chrome();
        shell
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ShellState::Running
    }

    /// Move to `Stopped`. There is no way back.
    pub fn stop(&mut self, reason: ExitReason) {
        if self.state == ShellState::Running {
            info!("Stopping: {reason:?}");
            self.state = ShellState::Stopped;
        }
    }

    /// Feed the pointer state sampled this frame. A press that starts over
    /// the Exit button stops the shell.
    pub fn pointer(&mut self, position: Option<(f32, f32)>, down: bool) {
        let pressed = down && !self.mouse_was_down;
        self.mouse_was_down = down;

        if pressed && position.is_some_and(|(x, y)| self.layout.hits_exit(x, y)) {
            self.stop(ExitReason::ExitButton);
        }
    }

    /// Put `image` into the image area.
    pub fn show(&mut self, image: &Tensor<u8>) {
        blit(
            &mut self.canvas,
            WINDOW_WIDTH,
            WINDOW_HEIGHT,
            self.layout.image.origin,
            image,
        );
    }

    /// Current framebuffer as packed pixels for minifb.
    pub fn framebuffer(&self) -> Vec<u32> {
        rgb_to_argb(&self.canvas, WINDOW_WIDTH, WINDOW_HEIGHT)
    }

    fn draw_chrome(&mut self) {
        let (w, h) = (WINDOW_WIDTH, WINDOW_HEIGHT);
        fill_rect(
            &mut self.canvas,
            w,
            h,
            Vec2::zero(),
            Vec2::new(w as i32 - 1, h as i32 - 1),
            BACKGROUND,
        );
        fill_rect(
            &mut self.canvas,
            w,
            h,
            self.layout.image.min(),
            self.layout.image.max() - Vec2::new(1, 1),
            [0, 0, 0],
        );

        let button = self.layout.exit_button;
        let corner = button.max() - Vec2::new(1, 1);
        fill_rect(&mut self.canvas, w, h, button.min(), corner, BUTTON_FACE);
        draw_rect(&mut self.canvas, w, h, button.min(), corner, 1, BUTTON_BORDER);

        let label = text_size(BUTTON_LABEL, BUTTON_LABEL_SCALE);
        let center = button.center();
        let origin = Vec2::new(center.x - label.x / 2, center.y + label.y / 2);
        draw_text(
            &mut self.canvas,
            w,
            h,
            origin,
            BUTTON_LABEL,
            BUTTON_LABEL_SCALE,
            BUTTON_TEXT,
        );
    }
}

/// Open the window and tick `pipeline` until the user exits.
///
/// The next tick is scheduled `tick_interval` after the previous one
/// finished, however long it took. A tick error closes the window and is
/// returned. The pipeline, and with it the camera, is dropped on return.
pub async fn run<C, D, S>(
    mut pipeline: Pipeline<C, D, S>,
    tick_interval: Duration,
) -> Result<(), AppError>
where
    C: Camera,
    D: LandmarkDetector,
    S: VolumeSink,
{
    let mut window = Window::new(
        WINDOW_TITLE,
        WINDOW_WIDTH,
        WINDOW_HEIGHT,
        WindowOptions::default(),
    )?;
    let mut shell = Shell::default();
    let mut framebuffer = shell.framebuffer();

    info!("Starting main loop, tick every {tick_interval:?}");

    while shell.is_running() {
        if !window.is_open() {
            shell.stop(ExitReason::WindowClosed);
            break;
        }
        if window.is_key_down(Key::Escape) {
            shell.stop(ExitReason::EscapePressed);
            break;
        }
        shell.pointer(
            window.get_mouse_pos(MouseMode::Discard),
            window.get_mouse_down(MouseButton::Left),
        );
        if !shell.is_running() {
            break;
        }

        match pipeline.tick().await? {
            TickOutcome::Rendered(frame) => {
                shell.show(&frame.image);
                framebuffer = shell.framebuffer();
            }
            TickOutcome::Skipped => debug!("Tick skipped"),
        }

        window.update_with_buffer(&framebuffer, WINDOW_WIDTH, WINDOW_HEIGHT)?;
        tokio::time::sleep(tick_interval).await;
    }

    drop(window);
    drop(pipeline);
    info!("Window closed, camera released");
    Ok(())
}
