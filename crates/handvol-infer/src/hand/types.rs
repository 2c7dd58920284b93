use handvol_base::Vec2;

/// Landmarks per hand in the MediaPipe hand topology.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// One keypoint in normalized image coordinates.
///
/// `x` and `y` are fractions of the frame width and height; `z` is depth
/// relative to the wrist, on roughly the same scale as `x`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Pixel position in a `width` x `height` frame, truncated toward zero.
    pub fn to_pixel(&self, width: usize, height: usize) -> Vec2<i32> {
        Vec2::new(
            (self.x * width as f32) as i32,
            (self.y * height as f32) as i32,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandLandmarkIndex {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexFingerMcp = 5,
    IndexFingerPip = 6,
    IndexFingerDip = 7,
    IndexFingerTip = 8,
    MiddleFingerMcp = 9,
    MiddleFingerPip = 10,
    MiddleFingerDip = 11,
    MiddleFingerTip = 12,
    RingFingerMcp = 13,
    RingFingerPip = 14,
    RingFingerDip = 15,
    RingFingerTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmarkIndex {
    pub const ALL: [HandLandmarkIndex; HAND_LANDMARK_COUNT] = {
        use HandLandmarkIndex::*;
        [
            Wrist,
            ThumbCmc,
            ThumbMcp,
            ThumbIp,
            ThumbTip,
            IndexFingerMcp,
            IndexFingerPip,
            IndexFingerDip,
            IndexFingerTip,
            MiddleFingerMcp,
            MiddleFingerPip,
            MiddleFingerDip,
            MiddleFingerTip,
            RingFingerMcp,
            RingFingerPip,
            RingFingerDip,
            RingFingerTip,
            PinkyMcp,
            PinkyPip,
            PinkyDip,
            PinkyTip,
        ]
    };
}

impl From<HandLandmarkIndex> for usize {
    fn from(index: HandLandmarkIndex) -> usize {
        index as usize
    }
}

impl TryFrom<usize> for HandLandmarkIndex {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::ALL.get(value).copied().ok_or_else(|| {
            format!("invalid hand landmark index {value}, must be below {HAND_LANDMARK_COUNT}")
        })
    }
}

/// Bone segments of the hand skeleton, as drawn by MediaPipe.
pub const HAND_CONNECTIONS: [(HandLandmarkIndex, HandLandmarkIndex); 21] = {
    use HandLandmarkIndex::*;
    [
        // palm
        (Wrist, ThumbCmc),
        (Wrist, IndexFingerMcp),
        (IndexFingerMcp, MiddleFingerMcp),
        (MiddleFingerMcp, RingFingerMcp),
        (RingFingerMcp, PinkyMcp),
        (Wrist, PinkyMcp),
        // thumb
        (ThumbCmc, ThumbMcp),
        (ThumbMcp, ThumbIp),
        (ThumbIp, ThumbTip),
        // index
        (IndexFingerMcp, IndexFingerPip),
        (IndexFingerPip, IndexFingerDip),
        (IndexFingerDip, IndexFingerTip),
        // middle
        (MiddleFingerMcp, MiddleFingerPip),
        (MiddleFingerPip, MiddleFingerDip),
        (MiddleFingerDip, MiddleFingerTip),
        // ring
        (RingFingerMcp, RingFingerPip),
        (RingFingerPip, RingFingerDip),
        (RingFingerDip, RingFingerTip),
        // pinky
        (PinkyMcp, PinkyPip),
        (PinkyPip, PinkyDip),
        (PinkyDip, PinkyTip),
    ]
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

/// One detected hand.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    pub landmarks: [Landmark; HAND_LANDMARK_COUNT],
    /// Hand presence score after activation.
    pub score: f32,
    /// `None` when the model has no handedness output.
    pub handedness: Option<Handedness>,
}

impl HandLandmarks {
    pub fn landmark(&self, index: HandLandmarkIndex) -> &Landmark {
        &self.landmarks[usize::from(index)]
    }

    /// Pixel position of one landmark in a `width` x `height` frame.
    pub fn pixel(&self, index: HandLandmarkIndex, width: usize, height: usize) -> Vec2<i32> {
        self.landmark(index).to_pixel(width, height)
    }
}

/// Letterbox transform between the original frame and the square model input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxInfo {
    /// Scale applied to the frame, `min(size / width, size / height)`.
    pub scale: f32,
    /// Horizontal padding in model-input pixels.
    pub pad_x: f32,
    /// Vertical padding in model-input pixels.
    pub pad_y: f32,
}
