mod landmarker;
mod palm;
mod postprocess;
mod preprocess;
mod roi;
mod types;

pub use landmarker::{HandLandmarker, HandLandmarkerConfig, ScoreActivation};
pub use palm::{
    Anchor, PALM_INPUT_SIZE, PALM_KEYPOINT_COUNT, PALM_VALUES_PER_ANCHOR, PalmDetection,
    decode_palms, palm_anchors, suppress_palms,
};
pub use postprocess::{postprocess, sigmoid};
pub use preprocess::{INPUT_SIZE, InputLayout, preprocess};
pub use roi::HandRoi;
pub use types::{
    HAND_CONNECTIONS, HAND_LANDMARK_COUNT, HandLandmarkIndex, HandLandmarks, Handedness, Landmark,
    LetterboxInfo,
};
