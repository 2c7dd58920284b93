use crate::InferError;
use handvol_base::{Tensor, Vec2};

use super::roi::HandRoi;
use super::types::{HAND_LANDMARK_COUNT, HandLandmarks, Handedness, Landmark};

pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Turn raw landmark-model output into a [`HandLandmarks`].
///
/// `raw` holds 21 `(x, y, z)` triples in crop pixels (`input_size` square),
/// in any shape with 63 elements. Coordinates are mapped back through `roi`
/// and normalized by the frame size. `handedness` is the right-hand
/// probability. Returns `None` when any value is not finite, which happens
/// when the model diverges on a frame.
pub fn postprocess(
    raw: &Tensor<f32>,
    score: f32,
    handedness: Option<f32>,
    roi: &HandRoi,
    input_size: usize,
    frame_width: usize,
    frame_height: usize,
) -> Result<Option<HandLandmarks>, InferError> {
    if raw.len() != HAND_LANDMARK_COUNT * 3 {
        return Err(InferError::ShapeMismatch {
            expected: format!("{} landmark values", HAND_LANDMARK_COUNT * 3),
            got: format!("{:?}", raw.shape),
        });
    }
    if frame_width == 0 || frame_height == 0 || input_size == 0 {
        return Err(InferError::ShapeMismatch {
            expected: "non-empty frame".to_string(),
            got: format!("{frame_width}x{frame_height}"),
        });
    }
    if raw.data.iter().any(|v| !v.is_finite()) {
        log::debug!("dropping hand with non-finite landmarks");
        return Ok(None);
    }

    let (fw, fh) = (frame_width as f32, frame_height as f32);
    let z_scale = roi.size / input_size as f32 / fw;
    let mut landmarks = [Landmark::default(); HAND_LANDMARK_COUNT];
    for (i, triple) in raw.data.chunks_exact(3).enumerate() {
        let p = roi.to_frame(Vec2::new(triple[0], triple[1]), input_size);
        landmarks[i] = Landmark::new(p.x / fw, p.y / fh, triple[2] * z_scale);
    }
    if landmarks.iter().any(|l| !(l.x.is_finite() && l.y.is_finite())) {
        log::debug!("dropping hand mapped outside the float range");
        return Ok(None);
    }

    Ok(Some(HandLandmarks {
        landmarks,
        score,
        handedness: handedness.map(|p| {
            if p >= 0.5 {
                Handedness::Right
            } else {
                Handedness::Left
            }
        }),
    }))
}
