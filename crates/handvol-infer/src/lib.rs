//! Hand-landmark inference for handvol.
//!
//! [`HandLandmarker`] turns an RGB frame into normalized hand landmarks: a
//! palm detector locates the hand, and a landmark network runs on the rotated
//! crop around it. Both models run through any [`Session`]. The ONNX Runtime
//! backend lives behind the `onnx` feature.

pub mod backend;
pub mod backends;
pub mod detector;
pub mod device;
pub mod error;
pub mod hand;
pub mod modelsource;
pub mod session;

pub use backend::Backend;
pub use detector::LandmarkDetector;
pub use device::Device;
pub use error::InferError;
pub use hand::{
    Anchor, HAND_CONNECTIONS, HAND_LANDMARK_COUNT, HandLandmarkIndex, HandLandmarker,
    HandLandmarkerConfig, HandLandmarks, HandRoi, Handedness, INPUT_SIZE, InputLayout, Landmark,
    LetterboxInfo, PALM_INPUT_SIZE, PALM_KEYPOINT_COUNT, PALM_VALUES_PER_ANCHOR, PalmDetection,
    ScoreActivation, decode_palms, palm_anchors, postprocess, preprocess, sigmoid,
    suppress_palms,
};
pub use modelsource::ModelSource;
pub use session::Session;

#[cfg(feature = "onnx")]
pub use backends::OnnxBackend;
