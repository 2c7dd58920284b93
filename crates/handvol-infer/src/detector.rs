use crate::{HandLandmarks, InferError};
use handvol_base::Tensor;

/// Anything that finds hands in an RGB frame.
pub trait LandmarkDetector {
    /// Detect hands in an `[height, width, 3]` frame. An empty vector means no
    /// hand was found; errors are reserved for broken input or a failing model.
    fn detect(&mut self, frame: &Tensor<u8>) -> Result<Vec<HandLandmarks>, InferError>;
}

impl<D: LandmarkDetector + ?Sized> LandmarkDetector for Box<D> {
    fn detect(&mut self, frame: &Tensor<u8>) -> Result<Vec<HandLandmarks>, InferError> {
        (**self).detect(frame)
    }
}
