use crate::error::AppError;
use handvol_camera::CameraConfig;
use handvol_infer::{Device, HandLandmarkerConfig, InputLayout, ScoreActivation};
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PALM_MODEL_PATH: &str = "models/palm_detection.onnx";
pub const DEFAULT_MODEL_PATH: &str = "models/hand_landmark.onnx";
pub const DEFAULT_CAMERA_DEVICE: &str = "/dev/video0";
pub const DEFAULT_SINK: &str = "@DEFAULT_SINK@";
pub const DEFAULT_TICK_MS: u64 = 10;
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.5;
pub const CAPTURE_WIDTH: u32 = 640;
pub const CAPTURE_HEIGHT: u32 = 480;

/// Runtime settings for the hand-volume app.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    palm_model_path: PathBuf,
    model_path: PathBuf,
    camera_device: String,
    sink: String,
    tick_interval: Duration,
    score_threshold: f32,
    log_dir: Option<PathBuf>,
    log_level: Option<LevelFilter>,
    device: Device,
    layout: InputLayout,
    activation: ScoreActivation,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            palm_model_path: PathBuf::from(DEFAULT_PALM_MODEL_PATH),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            camera_device: DEFAULT_CAMERA_DEVICE.to_string(),
            sink: DEFAULT_SINK.to_string(),
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            log_dir: None,
            log_level: None,
            device: Device::Cpu,
            layout: InputLayout::Nchw,
            activation: ScoreActivation::Identity,
        }
    }
}

impl AppConfig {
    /// Read `HANDVOL_*` variables from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset or empty keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get("HANDVOL_PALM_MODEL_PATH") {
            config.palm_model_path = PathBuf::from(path);
        }
        if let Some(path) = get("HANDVOL_MODEL_PATH") {
            config.model_path = PathBuf::from(path);
        }
        if let Some(device) = get("HANDVOL_CAMERA_DEVICE") {
            config.camera_device = device;
        }
        if let Some(sink) = get("HANDVOL_SINK") {
            config.sink = sink;
        }
        if let Some(ms) = get("HANDVOL_TICK_MS") {
            let ms: u64 = parse("HANDVOL_TICK_MS", &ms)?;
            if ms == 0 {
                return Err(AppError::Config(
                    "HANDVOL_TICK_MS must be at least 1".to_string(),
                ));
            }
            config.tick_interval = Duration::from_millis(ms);
        }
        if let Some(threshold) = get("HANDVOL_SCORE_THRESHOLD") {
            let threshold: f32 = parse("HANDVOL_SCORE_THRESHOLD", &threshold)?;
            if !(0.0..=1.0).contains(&threshold) {
                return Err(AppError::Config(format!(
                    "HANDVOL_SCORE_THRESHOLD must be within 0..=1, got {threshold}"
                )));
            }
            config.score_threshold = threshold;
        }
        if let Some(dir) = get("HANDVOL_LOG_DIR") {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(level) = get("HANDVOL_LOG_LEVEL") {
            config.log_level = Some(parse("HANDVOL_LOG_LEVEL", &level)?);
        }
        if let Some(device) = get("HANDVOL_DEVICE") {
            config.device = Device::from_str(&device)
                .map_err(|e| AppError::Config(format!("HANDVOL_DEVICE: {e}")))?;
        }
        if let Some(layout) = get("HANDVOL_INPUT_LAYOUT") {
            config.layout = match layout.trim().to_ascii_lowercase().as_str() {
                "nchw" => InputLayout::Nchw,
                "nhwc" => InputLayout::Nhwc,
                _ => {
                    return Err(AppError::Config(format!(
                        "HANDVOL_INPUT_LAYOUT: expected nchw or nhwc, got '{layout}'"
                    )));
                }
            };
        }
        if let Some(activation) = get("HANDVOL_SCORE_ACTIVATION") {
            config.activation = match activation.trim().to_ascii_lowercase().as_str() {
                "identity" => ScoreActivation::Identity,
                "sigmoid" => ScoreActivation::Sigmoid,
                _ => {
                    return Err(AppError::Config(format!(
                        "HANDVOL_SCORE_ACTIVATION: expected identity or sigmoid, got '{activation}'"
                    )));
                }
            };
        }

        Ok(config)
    }

    pub fn with_palm_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.palm_model_path = path.into();
        self
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn with_sink(mut self, sink: impl Into<String>) -> Self {
        self.sink = sink.into();
        self
    }

    pub fn palm_model_path(&self) -> &PathBuf {
        &self.palm_model_path
    }

    /// Hand landmark model.
    pub fn model_path(&self) -> &PathBuf {
        &self.model_path
    }

    pub fn camera_device(&self) -> &str {
        &self.camera_device
    }

    pub fn sink(&self) -> &str {
        &self.sink
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn score_threshold(&self) -> f32 {
        self.score_threshold
    }

    pub fn log_dir(&self) -> Option<&PathBuf> {
        self.log_dir.as_ref()
    }

    pub fn log_level(&self) -> Option<LevelFilter> {
        self.log_level
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// Capture settings: the configured device at 640x480.
    pub fn camera_config(&self) -> CameraConfig {
        CameraConfig::default()
            .with_device(self.camera_device.clone())
            .with_width(CAPTURE_WIDTH)
            .with_height(CAPTURE_HEIGHT)
    }

    pub fn landmarker_config(&self) -> HandLandmarkerConfig {
        HandLandmarkerConfig::default()
            .with_score_threshold(self.score_threshold)
            .with_layout(self.layout)
            .with_activation(self.activation)
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| AppError::Config(format!("{key}: cannot parse '{value}': {e}")))
}
