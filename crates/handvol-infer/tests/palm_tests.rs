use handvol_base::{Rect, Tensor, Vec2};
use handvol_infer::{
    InferError, LetterboxInfo, PALM_INPUT_SIZE, PALM_KEYPOINT_COUNT, PALM_VALUES_PER_ANCHOR,
    PalmDetection, decode_palms, palm_anchors, suppress_palms,
};

const IDENTITY: LetterboxInfo = LetterboxInfo {
    scale: 1.0,
    pad_x: 0.0,
    pad_y: 0.0,
};

/// Detector outputs where only `anchor` scores, with the given regression.
fn outputs(anchor: usize, logit: f32, raw: &[f32]) -> (Tensor<f32>, Tensor<f32>) {
    let count = palm_anchors(PALM_INPUT_SIZE).len();
    let mut boxes = vec![0.0; count * PALM_VALUES_PER_ANCHOR];
    boxes[anchor * PALM_VALUES_PER_ANCHOR..anchor * PALM_VALUES_PER_ANCHOR + raw.len()]
        .copy_from_slice(raw);
    let mut scores = vec![-20.0; count];
    scores[anchor] = logit;
    (
        Tensor::new(vec![1, count, PALM_VALUES_PER_ANCHOR], boxes).unwrap(),
        Tensor::new(vec![1, count, 1], scores).unwrap(),
    )
}

/// Box centred 92 px right and down of anchor 0, wrist below, middle MCP above.
fn upright_palm_raw() -> Vec<f32> {
    vec![92.0, 92.0, 40.0, 40.0, 92.0, 116.0, 88.0, 80.0, 92.0, 68.0]
}

fn palm(x: f32, y: f32, size: f32, score: f32) -> PalmDetection {
    PalmDetection {
        bbox: Rect::new(Vec2::new(x, y), Vec2::new(size, size)),
        score,
        keypoints: [Vec2::zero(); PALM_KEYPOINT_COUNT],
    }
}

#[test]
fn test_anchor_count_matches_detector_output() {
    assert_eq!(palm_anchors(PALM_INPUT_SIZE).len(), 2016);
}

#[test]
fn test_anchor_grid_layout() {
    let anchors = palm_anchors(PALM_INPUT_SIZE);

    // Stride 8: 24x24 cells, two anchors each.
    assert_eq!(anchors[0].center, Vec2::new(0.5 / 24.0, 0.5 / 24.0));
    assert_eq!(anchors[1].center, anchors[0].center);
    assert_eq!(anchors[2].center, Vec2::new(1.5 / 24.0, 0.5 / 24.0));

    // Stride 16: 12x12 cells, six anchors each.
    assert_eq!(anchors[1152].center, Vec2::new(0.5 / 12.0, 0.5 / 12.0));
    assert_eq!(anchors[1157].center, anchors[1152].center);
    assert_eq!(anchors[1158].center, Vec2::new(1.5 / 12.0, 0.5 / 12.0));
    assert_eq!(anchors[2015].center, Vec2::new(11.5 / 12.0, 11.5 / 12.0));
}

#[test]
fn test_decode_offsets_from_anchor() {
    let anchors = palm_anchors(PALM_INPUT_SIZE);
    let (boxes, scores) = outputs(0, 5.0, &upright_palm_raw());

    let palms = decode_palms(&boxes, &scores, &anchors, &IDENTITY, 0.5).unwrap();

    assert_eq!(palms.len(), 1);
    let p = &palms[0];
    assert!(p.score > 0.99);
    assert!((p.bbox.origin.x - 76.0).abs() < 1e-4);
    assert!((p.bbox.origin.y - 76.0).abs() < 1e-4);
    assert!((p.bbox.size.x - 40.0).abs() < 1e-4);
    assert!((p.wrist().y - 120.0).abs() < 1e-4);
    assert!((p.middle_mcp().y - 72.0).abs() < 1e-4);
    assert!((p.middle_mcp().x - 96.0).abs() < 1e-4);
}

#[test]
fn test_decode_undoes_letterbox() {
    // 640x480 into 192x192: scale 0.3, 24 px bars top and bottom.
    let lb = LetterboxInfo {
        scale: 0.3,
        pad_x: 0.0,
        pad_y: 24.0,
    };
    let anchors = palm_anchors(PALM_INPUT_SIZE);
    let (boxes, scores) = outputs(0, 5.0, &upright_palm_raw());

    let palms = decode_palms(&boxes, &scores, &anchors, &lb, 0.5).unwrap();

    let center = palms[0].bbox.origin + palms[0].bbox.size * 0.5;
    assert!((center.x - 320.0).abs() < 1e-3);
    assert!((center.y - 240.0).abs() < 1e-3);
    assert!((palms[0].bbox.size.x - 40.0 / 0.3).abs() < 1e-3);
}

#[test]
fn test_low_scores_are_ignored() {
    let anchors = palm_anchors(PALM_INPUT_SIZE);
    let (boxes, scores) = outputs(0, -2.0, &upright_palm_raw());
    assert!(decode_palms(&boxes, &scores, &anchors, &IDENTITY, 0.5).unwrap().is_empty());
}

#[test]
fn test_non_finite_regression_is_skipped() {
    let anchors = palm_anchors(PALM_INPUT_SIZE);
    let mut raw = upright_palm_raw();
    raw[0] = f32::NAN;
    let (boxes, scores) = outputs(0, 5.0, &raw);
    assert!(decode_palms(&boxes, &scores, &anchors, &IDENTITY, 0.5).unwrap().is_empty());
}

#[test]
fn test_decode_rejects_wrong_sizes() {
    let anchors = palm_anchors(PALM_INPUT_SIZE);
    let boxes = Tensor::new(vec![1, 10], vec![0.0; 10]).unwrap();
    let scores = Tensor::new(vec![1, 2016], vec![0.0; 2016]).unwrap();
    assert!(matches!(
        decode_palms(&boxes, &scores, &anchors, &IDENTITY, 0.5),
        Err(InferError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_suppression_keeps_best_of_overlapping() {
    let palms = vec![
        palm(1.0, 1.0, 10.0, 0.8),
        palm(50.0, 50.0, 10.0, 0.7),
        palm(0.0, 0.0, 10.0, 0.9),
    ];

    let kept = suppress_palms(palms, 0.3);

    assert_eq!(kept.len(), 2);
    assert_eq!(kept[0].score, 0.9);
    assert_eq!(kept[1].score, 0.7);
}

#[test]
fn test_suppression_of_nothing() {
    assert!(suppress_palms(Vec::new(), 0.3).is_empty());
}
