//! Shared building blocks for the handvol workspace: the frame tensor, small
//! geometry types and the logging backends.

pub mod logging;
pub mod rect;
pub mod tensor;
pub mod vec2;

pub use logging::{
    FileLogger, StdoutLogger, init_file_logger, init_file_logger_with_level, init_stdout_logger,
    init_stdout_logger_with_level,
};
pub use rect::Rect;
pub use tensor::{Tensor, TensorError};
pub use vec2::Vec2;

// Re-export log crate so downstream crates can use handvol_base::log::*
pub use log;
