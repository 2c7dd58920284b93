//! Palm detection: SSD anchor decoding and non-maximum suppression.
//!
//! The palm detector runs on a 192x192 letterbox of the whole frame and
//! scores 2016 fixed anchors. Each anchor regresses a box plus seven palm
//! keypoints, all as pixel offsets from the anchor centre.

use crate::InferError;
use handvol_base::{Rect, Tensor, Vec2};
use std::collections::VecDeque;

use super::postprocess::sigmoid;
use super::types::LetterboxInfo;

/// Side length of the square palm-detector input.
pub const PALM_INPUT_SIZE: usize = 192;
/// Keypoints per palm: wrist centre, then the MCP joints and thumb.
pub const PALM_KEYPOINT_COUNT: usize = 7;
/// Box (4) plus keypoints (7 x 2) per anchor.
pub const PALM_VALUES_PER_ANCHOR: usize = 4 + 2 * PALM_KEYPOINT_COUNT;

/// Feature-map strides of the detector heads. Equal neighbouring strides
/// share one grid.
const ANCHOR_STRIDES: [usize; 4] = [8, 16, 16, 16];
/// Anchors per layer per cell: one at aspect 1.0, one interpolated.
const ANCHORS_PER_LAYER: usize = 2;
/// Logits are clipped before the sigmoid.
const SCORE_CLIP: f32 = 100.0;

/// Palm keypoint used as the rotation origin.
pub const PALM_WRIST: usize = 0;
/// Palm keypoint at the middle-finger MCP joint.
pub const PALM_MIDDLE_MCP: usize = 2;

/// Anchor centre in normalized input coordinates. All anchors are unit size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub center: Vec2<f32>,
}

/// One palm in frame pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PalmDetection {
    pub bbox: Rect<f32>,
    pub score: f32,
    pub keypoints: [Vec2<f32>; PALM_KEYPOINT_COUNT],
}

impl PalmDetection {
    pub fn wrist(&self) -> Vec2<f32> {
        self.keypoints[PALM_WRIST]
    }

    pub fn middle_mcp(&self) -> Vec2<f32> {
        self.keypoints[PALM_MIDDLE_MCP]
    }
}

/// Anchor grid for a `size` x `size` input, in model output order.
pub fn palm_anchors(size: usize) -> Vec<Anchor> {
    let mut anchors = Vec::new();
    let mut layer = 0;

    while layer < ANCHOR_STRIDES.len() {
        let stride = ANCHOR_STRIDES[layer];
        let mut per_cell = 0;
        while layer < ANCHOR_STRIDES.len() && ANCHOR_STRIDES[layer] == stride {
            per_cell += ANCHORS_PER_LAYER;
            layer += 1;
        }

        let cells = size.div_ceil(stride);
        for y in 0..cells {
            for x in 0..cells {
                let center = Vec2::new(
                    (x as f32 + 0.5) / cells as f32,
                    (y as f32 + 0.5) / cells as f32,
                );
                anchors.extend(std::iter::repeat_n(Anchor { center }, per_cell));
            }
        }
    }

    anchors
}

/// Decode raw detector outputs into palms above `score_threshold`.
///
/// `boxes` holds `anchors.len() x 18` regressions and `scores` one logit per
/// anchor. Results are mapped through `letterbox` into frame pixels and are
/// not yet suppressed.
pub fn decode_palms(
    boxes: &Tensor<f32>,
    scores: &Tensor<f32>,
    anchors: &[Anchor],
    letterbox: &LetterboxInfo,
    score_threshold: f32,
) -> Result<Vec<PalmDetection>, InferError> {
    if boxes.len() != anchors.len() * PALM_VALUES_PER_ANCHOR {
        return Err(InferError::ShapeMismatch {
            expected: format!("{} x {PALM_VALUES_PER_ANCHOR} box values", anchors.len()),
            got: format!("{:?}", boxes.shape),
        });
    }
    if scores.len() != anchors.len() {
        return Err(InferError::ShapeMismatch {
            expected: format!("{} scores", anchors.len()),
            got: format!("{:?}", scores.shape),
        });
    }
    if letterbox.scale <= 0.0 {
        return Err(InferError::ShapeMismatch {
            expected: "positive letterbox scale".to_string(),
            got: letterbox.scale.to_string(),
        });
    }

    let side = PALM_INPUT_SIZE as f32;
    let to_frame = |p: Vec2<f32>| {
        Vec2::new(
            (p.x - letterbox.pad_x) / letterbox.scale,
            (p.y - letterbox.pad_y) / letterbox.scale,
        )
    };

    let mut palms = Vec::new();
    for (i, anchor) in anchors.iter().enumerate() {
        let score = sigmoid(scores.data[i].clamp(-SCORE_CLIP, SCORE_CLIP));
        if score < score_threshold {
            continue;
        }

        let raw = &boxes.data[i * PALM_VALUES_PER_ANCHOR..(i + 1) * PALM_VALUES_PER_ANCHOR];
        if raw.iter().any(|v| !v.is_finite()) {
            continue;
        }
        let origin = anchor.center * side;
        let center = to_frame(origin + Vec2::new(raw[0], raw[1]));
        let size = Vec2::new(raw[2], raw[3]) * (1.0 / letterbox.scale);

        let mut keypoints = [Vec2::zero(); PALM_KEYPOINT_COUNT];
        for (k, point) in keypoints.iter_mut().enumerate() {
            *point = to_frame(origin + Vec2::new(raw[4 + 2 * k], raw[5 + 2 * k]));
        }

        palms.push(PalmDetection {
            bbox: Rect::new(center - size * 0.5, size),
            score,
            keypoints,
        });
    }

    Ok(palms)
}

fn iou(a: &Rect<f32>, b: &Rect<f32>) -> f32 {
    match a.intersection(*b) {
        None => 0.0,
        Some(inter) => {
            let union = a.area() + b.area() - inter.area();
            if union > 0.0 { inter.area() / union } else { 0.0 }
        }
    }
}

/// Keep the highest-scoring palms, dropping any that overlap a kept one by
/// `iou_threshold` or more. The result is sorted by score, best first.
pub fn suppress_palms(palms: Vec<PalmDetection>, iou_threshold: f32) -> Vec<PalmDetection> {
    let mut queue: VecDeque<PalmDetection> = {
        let mut sorted = palms;
        sorted.sort_by(|a, b| b.score.total_cmp(&a.score));
        sorted.into()
    };

    let mut keep: Vec<PalmDetection> = Vec::new();
    while let Some(best) = queue.pop_front() {
        queue.retain(|other| iou(&best.bbox, &other.bbox) < iou_threshold);
        keep.push(best);
    }
    keep
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iou_partial_overlap() {
        let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Rect::new(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0));
        // 25 / (100 + 100 - 25)
        assert!((iou(&a, &b) - 0.142857).abs() < 1e-4);
    }

    #[test]
    fn test_iou_degenerate_boxes() {
        let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0));
        assert_eq!(iou(&a, &a), 0.0);
    }
}
