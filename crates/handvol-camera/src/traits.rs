use crate::CameraError;
use handvol_base::Tensor;

/// Async source of camera frames.
#[allow(async_fn_in_trait)]
pub trait Camera {
    /// Receive the next frame as an RGB `Tensor<u8>` shaped `[height, width, 3]`.
    ///
    /// An error means this frame is unavailable; callers decide whether to
    /// skip it or give up.
    async fn recv(&mut self) -> Result<Tensor<u8>, CameraError>;
}
