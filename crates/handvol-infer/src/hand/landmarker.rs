use crate::{Backend, InferError, LandmarkDetector, ModelSource, Session};
use handvol_base::Tensor;
use std::collections::HashMap;

use super::palm::{
    Anchor, PALM_INPUT_SIZE, PALM_VALUES_PER_ANCHOR, decode_palms, palm_anchors, suppress_palms,
};
use super::postprocess::{postprocess, sigmoid};
use super::preprocess::{INPUT_SIZE, InputLayout, preprocess};
use super::roi::HandRoi;
use super::types::{HAND_LANDMARK_COUNT, HandLandmarks};

/// How the raw presence output becomes a score in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreActivation {
    /// The model already outputs a probability (or a logit compared against
    /// the threshold directly).
    #[default]
    Identity,
    /// The model outputs a logit.
    Sigmoid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarkerConfig {
    /// Minimum hand presence score from the landmark model.
    pub score_threshold: f32,
    /// Minimum palm detection score (after sigmoid).
    pub palm_score_threshold: f32,
    /// Overlap at which a weaker palm box is suppressed.
    pub palm_iou_threshold: f32,
    pub layout: InputLayout,
    pub activation: ScoreActivation,
}

impl Default for HandLandmarkerConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.5,
            palm_score_threshold: 0.5,
            palm_iou_threshold: 0.3,
            layout: InputLayout::Nchw,
            activation: ScoreActivation::Identity,
        }
    }
}

impl HandLandmarkerConfig {
    pub fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = threshold;
        self
    }

    pub fn with_palm_score_threshold(mut self, threshold: f32) -> Self {
        self.palm_score_threshold = threshold;
        self
    }

    pub fn with_palm_iou_threshold(mut self, threshold: f32) -> Self {
        self.palm_iou_threshold = threshold;
        self
    }

    pub fn with_layout(mut self, layout: InputLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_activation(mut self, activation: ScoreActivation) -> Self {
        self.activation = activation;
        self
    }
}

/// Two-stage hand landmark detector.
///
/// A palm detector finds the best palm in a 192x192 letterbox of the frame.
/// Its box and keypoints give a rotated square region around the whole hand,
/// which is cropped to 224x224 and handed to the landmark network. Landmarks
/// are then mapped back through the same region. Every frame is detected
/// from scratch and at most one hand is reported.
///
/// Model outputs are matched by size in declaration order. The palm model
/// has one `2016 x 18` box output and one `2016` score output. The landmark
/// model has a 63-value landmark output, then single-value presence score
/// and handedness outputs.
pub struct HandLandmarker {
    palm: Box<dyn Session>,
    landmark: Box<dyn Session>,
    anchors: Vec<Anchor>,
    config: HandLandmarkerConfig,
}

impl HandLandmarker {
    pub fn new(
        palm_model: ModelSource,
        landmark_model: ModelSource,
        backend: &dyn Backend,
    ) -> Result<Self, InferError> {
        let palm = backend.load_model(palm_model)?;
        log::info!("palm detection model loaded with {} backend", backend.name());
        let landmark = backend.load_model(landmark_model)?;
        log::info!("hand landmark model loaded with {} backend", backend.name());
        Ok(Self::from_sessions(palm, landmark, HandLandmarkerConfig::default()))
    }

    pub fn from_sessions(
        palm: Box<dyn Session>,
        landmark: Box<dyn Session>,
        config: HandLandmarkerConfig,
    ) -> Self {
        Self {
            palm,
            landmark,
            anchors: palm_anchors(PALM_INPUT_SIZE),
            config,
        }
    }

    pub fn with_config(mut self, config: HandLandmarkerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &HandLandmarkerConfig {
        &self.config
    }

    fn activate(&self, raw: f32) -> f32 {
        match self.config.activation {
            ScoreActivation::Identity => raw,
            ScoreActivation::Sigmoid => sigmoid(raw),
        }
    }

    /// Best palm region in the frame, if any palm clears the threshold.
    fn find_hand(&mut self, frame: &Tensor<u8>) -> Result<Option<HandRoi>, InferError> {
        let (input, letterbox) = preprocess(frame, PALM_INPUT_SIZE, self.config.layout)?;
        let outputs = run_single_input(self.palm.as_mut(), input)?;

        let anchor_count = self.anchors.len();
        let boxes = find_output(
            &outputs,
            self.palm.output_names(),
            anchor_count * PALM_VALUES_PER_ANCHOR,
        )
        .ok_or_else(|| {
            InferError::MissingOutput(format!(
                "no {anchor_count} x {PALM_VALUES_PER_ANCHOR} palm box output among {:?}",
                self.palm.output_names()
            ))
        })?;
        let scores = find_output(&outputs, self.palm.output_names(), anchor_count)
            .ok_or_else(|| {
                InferError::MissingOutput(format!(
                    "no {anchor_count}-value palm score output among {:?}",
                    self.palm.output_names()
                ))
            })?;

        let palms = decode_palms(
            boxes,
            scores,
            &self.anchors,
            &letterbox,
            self.config.palm_score_threshold,
        )?;
        let best = suppress_palms(palms, self.config.palm_iou_threshold)
            .into_iter()
            .next();
        if let Some(palm) = &best {
            log::trace!("palm score {:.3} at {:?}", palm.score, palm.bbox);
        }
        Ok(best.as_ref().map(HandRoi::from_palm))
    }
}

fn run_single_input(
    session: &mut dyn Session,
    input: Tensor<f32>,
) -> Result<HashMap<String, Tensor<f32>>, InferError> {
    let input_name = session
        .input_names()
        .first()
        .ok_or_else(|| InferError::BackendError("model has no inputs".to_string()))?
        .clone();
    session.run(&[(input_name.as_str(), input)])
}

/// First output, in declaration order, with exactly `len` elements.
fn find_output<'a>(
    outputs: &'a HashMap<String, Tensor<f32>>,
    names: &[String],
    len: usize,
) -> Option<&'a Tensor<f32>> {
    names
        .iter()
        .filter_map(|name| outputs.get(name))
        .find(|tensor| tensor.len() == len)
}

impl LandmarkDetector for HandLandmarker {
    fn detect(&mut self, frame: &Tensor<u8>) -> Result<Vec<HandLandmarks>, InferError> {
        let Some(roi) = self.find_hand(frame)? else {
            return Ok(Vec::new());
        };

        let input = roi.crop(frame, INPUT_SIZE, self.config.layout)?;
        let outputs = run_single_input(self.landmark.as_mut(), input)?;

        let names = self.landmark.output_names();
        let landmarks = find_output(&outputs, names, HAND_LANDMARK_COUNT * 3).ok_or_else(|| {
            InferError::MissingOutput(format!(
                "no {}-value landmark output among {names:?}",
                HAND_LANDMARK_COUNT * 3
            ))
        })?;
        let singles: Vec<f32> = names
            .iter()
            .filter_map(|name| outputs.get(name))
            .filter(|tensor| tensor.len() == 1)
            .map(|tensor| tensor.data[0])
            .collect();
        let raw_score = *singles.first().ok_or_else(|| {
            InferError::MissingOutput("no single-value presence score output".to_string())
        })?;

        let score = self.activate(raw_score);
        if score < self.config.score_threshold {
            log::trace!("no hand: score {score:.3}");
            return Ok(Vec::new());
        }

        let hand = postprocess(
            landmarks,
            score,
            singles.get(1).copied(),
            &roi,
            INPUT_SIZE,
            frame.shape[1],
            frame.shape[0],
        )?;
        Ok(hand.into_iter().collect())
    }
}
