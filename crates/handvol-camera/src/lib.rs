//! Camera capture for handvol.
//!
//! The [`Camera`] trait yields decoded RGB frames as `Tensor<u8>` in HWC
//! layout. The V4L2 backend is behind the `v4l2` feature.

pub mod config;
pub mod convert;
pub mod error;
pub mod traits;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use config::CameraConfig;
pub use convert::{decode_mjpeg, yuyv_to_rgb};
pub use error::CameraError;
pub use traits::Camera;

#[cfg(feature = "v4l2")]
pub use v4l2::V4l2Camera;
