//! Hand-gesture volume control.
//!
//! Each tick grabs a camera frame, finds a hand, turns the thumb/index pinch
//! distance into a master volume level and shows the annotated frame in a
//! small window. The hardware-facing pieces (V4L2, ONNX Runtime, PulseAudio)
//! are only pulled in by the `hardware` feature; everything here runs against
//! the traits so it can be driven by test doubles.

pub mod config;
pub mod draw;
pub mod error;
pub mod mapper;
pub mod pipeline;
pub mod render;
pub mod shell;

pub use config::AppConfig;
pub use error::AppError;
pub use mapper::{GestureMapper, GestureReading, LinearMap, MapError};
pub use pipeline::{Pipeline, RenderedFrame, TickOutcome, open_sink_or_unavailable};
pub use render::{HandOverlay, render};
pub use shell::{ExitReason, Layout, Shell, ShellState};
