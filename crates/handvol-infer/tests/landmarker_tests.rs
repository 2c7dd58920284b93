use handvol_base::Tensor;
use handvol_infer::{
    Backend, HandLandmarkIndex, HandLandmarker, HandLandmarkerConfig, Handedness, InferError,
    LandmarkDetector, ModelSource, PALM_INPUT_SIZE, PALM_VALUES_PER_ANCHOR, ScoreActivation,
    Session, palm_anchors,
};
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

/// Session returning canned outputs, counting runs and recording the input
/// shape it was given.
struct CannedSession {
    inputs: Vec<String>,
    outputs: Vec<String>,
    values: HashMap<String, Tensor<f32>>,
    runs: Rc<Cell<usize>>,
    last_input_shape: Rc<Cell<Option<(usize, usize)>>>,
}

impl CannedSession {
    fn new(outputs: Vec<(&str, Tensor<f32>)>) -> Self {
        Self {
            inputs: vec!["input".to_string()],
            outputs: outputs.iter().map(|(name, _)| name.to_string()).collect(),
            values: outputs
                .into_iter()
                .map(|(name, tensor)| (name.to_string(), tensor))
                .collect(),
            runs: Rc::new(Cell::new(0)),
            last_input_shape: Rc::new(Cell::new(None)),
        }
    }

    /// Palm detector output with one upright palm at anchor 0 when `found`.
    ///
    /// On a 192x192 frame the palm box is 40 px centred at (96, 96), the
    /// wrist at (96, 120) and the middle MCP at (96, 72). The hand region is
    /// then 104 px centred at (96, 76), unrotated.
    fn palm(found: bool) -> Self {
        let count = palm_anchors(PALM_INPUT_SIZE).len();
        let mut boxes = vec![0.0f32; count * PALM_VALUES_PER_ANCHOR];
        boxes[..10].copy_from_slice(&[
            92.0, 92.0, 40.0, 40.0, 92.0, 116.0, 88.0, 80.0, 92.0, 68.0,
        ]);
        let mut scores = vec![-10.0f32; count];
        if found {
            scores[0] = 5.0;
        }
        Self::new(vec![
            (
                "regressors",
                Tensor::new(vec![1, count, PALM_VALUES_PER_ANCHOR], boxes).unwrap(),
            ),
            ("classificators", Tensor::new(vec![1, count, 1], scores).unwrap()),
        ])
    }

    /// Landmark output with the thumb tip at the crop centre.
    fn hand(score: f32, handedness: f32) -> Self {
        let mut lm = vec![0.0f32; 63];
        lm[4 * 3] = 112.0;
        lm[4 * 3 + 1] = 112.0;
        Self::new(vec![
            ("xyz_x21", Tensor::new(vec![1, 63], lm).unwrap()),
            ("hand_score", Tensor::new(vec![1, 1], vec![score]).unwrap()),
            ("handedness", Tensor::new(vec![1, 1], vec![handedness]).unwrap()),
        ])
    }
}

impl Session for CannedSession {
    fn run(
        &mut self,
        inputs: &[(&str, Tensor<f32>)],
    ) -> Result<HashMap<String, Tensor<f32>>, InferError> {
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].0, "input");
        let shape = &inputs[0].1.shape;
        self.last_input_shape.set(Some((shape[2], shape[3])));
        self.runs.set(self.runs.get() + 1);
        Ok(self.values.clone())
    }

    fn input_names(&self) -> &[String] {
        &self.inputs
    }

    fn output_names(&self) -> &[String] {
        &self.outputs
    }
}

/// Hands out the palm model first, then the landmark model.
struct CannedBackend {
    loads: Cell<usize>,
}

impl Backend for CannedBackend {
    fn name(&self) -> &str {
        "canned"
    }

    fn load_model(&self, _model: ModelSource) -> Result<Box<dyn Session>, InferError> {
        let n = self.loads.get();
        self.loads.set(n + 1);
        Ok(if n == 0 {
            Box::new(CannedSession::palm(true))
        } else {
            Box::new(CannedSession::hand(0.97, 0.9))
        })
    }
}

fn frame() -> Tensor<u8> {
    Tensor::from_rgb(192, 192, vec![0u8; 192 * 192 * 3]).unwrap()
}

fn landmarker(
    palm: CannedSession,
    hand: CannedSession,
    config: HandLandmarkerConfig,
) -> HandLandmarker {
    HandLandmarker::from_sessions(Box::new(palm), Box::new(hand), config)
}

#[test]
fn test_detects_hand_through_palm_region() {
    let backend = CannedBackend { loads: Cell::new(0) };
    let mut detector = HandLandmarker::new(
        ModelSource::Memory(Vec::new()),
        ModelSource::Memory(Vec::new()),
        &backend,
    )
    .unwrap();
    let hands = detector.detect(&frame()).unwrap();

    assert_eq!(backend.loads.get(), 2);
    assert_eq!(hands.len(), 1);
    // Crop centre lands on the region centre.
    let thumb = hands[0].landmark(HandLandmarkIndex::ThumbTip);
    assert!((thumb.x - 96.0 / 192.0).abs() < 1e-4);
    assert!((thumb.y - 76.0 / 192.0).abs() < 1e-4);
    assert!((hands[0].score - 0.97).abs() < 1e-6);
}

#[test]
fn test_stage_input_sizes() {
    let palm = CannedSession::palm(true);
    let hand = CannedSession::hand(0.9, 0.9);
    let palm_shape = palm.last_input_shape.clone();
    let hand_shape = hand.last_input_shape.clone();

    let mut detector = landmarker(palm, hand, HandLandmarkerConfig::default());
    detector.detect(&frame()).unwrap();

    assert_eq!(palm_shape.get(), Some((192, 192)));
    assert_eq!(hand_shape.get(), Some((224, 224)));
}

#[test]
fn test_no_palm_skips_landmark_model() {
    let hand = CannedSession::hand(0.9, 0.9);
    let runs = hand.runs.clone();
    let mut detector = landmarker(
        CannedSession::palm(false),
        hand,
        HandLandmarkerConfig::default(),
    );

    assert!(detector.detect(&frame()).unwrap().is_empty());
    assert_eq!(runs.get(), 0);
}

#[test]
fn test_palm_threshold_is_configurable() {
    // Logit 5 is ~0.993 after sigmoid.
    let config = HandLandmarkerConfig::default().with_palm_score_threshold(0.999);
    let mut detector = landmarker(CannedSession::palm(true), CannedSession::hand(0.9, 0.9), config);
    assert!(detector.detect(&frame()).unwrap().is_empty());
}

#[test]
fn test_no_hand_below_threshold() {
    let mut detector = landmarker(
        CannedSession::palm(true),
        CannedSession::hand(0.2, 0.9),
        HandLandmarkerConfig::default(),
    );
    assert!(detector.detect(&frame()).unwrap().is_empty());
}

#[test]
fn test_sigmoid_activation_applies_to_logits() {
    // Logit -3 is ~0.047 after sigmoid: below 0.5.
    let config = HandLandmarkerConfig::default().with_activation(ScoreActivation::Sigmoid);
    let mut detector = landmarker(
        CannedSession::palm(true),
        CannedSession::hand(-3.0, 0.9),
        config.clone(),
    );
    assert!(detector.detect(&frame()).unwrap().is_empty());

    let mut detector = landmarker(CannedSession::palm(true), CannedSession::hand(3.0, 0.9), config);
    assert_eq!(detector.detect(&frame()).unwrap().len(), 1);
}

#[test]
fn test_missing_landmark_output_is_error() {
    let mut hand = CannedSession::hand(0.9, 0.9);
    hand.values.remove("xyz_x21");
    let mut detector = landmarker(CannedSession::palm(true), hand, HandLandmarkerConfig::default());
    assert!(matches!(
        detector.detect(&frame()),
        Err(InferError::MissingOutput(_))
    ));
}

#[test]
fn test_missing_palm_output_is_error() {
    let mut palm = CannedSession::palm(true);
    palm.values.remove("classificators");
    let mut detector = landmarker(palm, CannedSession::hand(0.9, 0.9), HandLandmarkerConfig::default());
    assert!(matches!(
        detector.detect(&frame()),
        Err(InferError::MissingOutput(_))
    ));
}

#[test]
fn test_bad_frame_propagates_error() {
    let mut detector = landmarker(
        CannedSession::palm(true),
        CannedSession::hand(0.9, 0.9),
        HandLandmarkerConfig::default(),
    );
    let gray = Tensor::new(vec![2, 2, 1], vec![0u8; 4]).unwrap();
    assert!(detector.detect(&gray).is_err());
}

#[test]
fn test_boxed_detector_is_a_detector() {
    let mut detector: Box<dyn LandmarkDetector> = Box::new(landmarker(
        CannedSession::palm(true),
        CannedSession::hand(0.9, 0.1),
        HandLandmarkerConfig::default().with_score_threshold(0.8),
    ));
    let hands = detector.detect(&frame()).unwrap();
    assert_eq!(hands[0].handedness, Some(Handedness::Left));
}
