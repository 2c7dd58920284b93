use hand_volume::{AppConfig, AppError};
use handvol_infer::{Device, InputLayout, ScoreActivation};
use log::LevelFilter;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

fn from_pairs(pairs: &[(&str, &str)]) -> Result<AppConfig, AppError> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn test_defaults() {
    let config = from_pairs(&[]).unwrap();
    assert_eq!(config, AppConfig::default());
    assert_eq!(
        config.palm_model_path(),
        &PathBuf::from("models/palm_detection.onnx")
    );
    assert_eq!(config.model_path(), &PathBuf::from("models/hand_landmark.onnx"));
    assert_eq!(config.camera_device(), "/dev/video0");
    assert_eq!(config.sink(), "@DEFAULT_SINK@");
    assert_eq!(config.tick_interval(), Duration::from_millis(10));
    assert_eq!(config.score_threshold(), 0.5);
    assert_eq!(config.log_dir(), None);
    assert_eq!(config.log_level(), None);
    assert_eq!(config.device(), Device::Cpu);
}

#[test]
fn test_overrides() {
    let config = from_pairs(&[
        ("HANDVOL_PALM_MODEL_PATH", "/opt/models/palm.onnx"),
        ("HANDVOL_MODEL_PATH", "/opt/models/hand.onnx"),
        ("HANDVOL_CAMERA_DEVICE", "/dev/video2"),
        ("HANDVOL_SINK", "alsa_output.usb"),
        ("HANDVOL_TICK_MS", "33"),
        ("HANDVOL_SCORE_THRESHOLD", "0.7"),
        ("HANDVOL_LOG_DIR", "/tmp/handvol"),
        ("HANDVOL_LOG_LEVEL", "warn"),
        ("HANDVOL_DEVICE", "cuda:1"),
    ])
    .unwrap();

    assert_eq!(config.palm_model_path(), &PathBuf::from("/opt/models/palm.onnx"));
    assert_eq!(config.model_path(), &PathBuf::from("/opt/models/hand.onnx"));
    assert_eq!(config.camera_device(), "/dev/video2");
    assert_eq!(config.sink(), "alsa_output.usb");
    assert_eq!(config.tick_interval(), Duration::from_millis(33));
    assert_eq!(config.score_threshold(), 0.7);
    assert_eq!(config.log_dir(), Some(&PathBuf::from("/tmp/handvol")));
    assert_eq!(config.log_level(), Some(LevelFilter::Warn));
    assert_eq!(config.device(), Device::Cuda { device_id: 1 });
}

#[test]
fn test_empty_values_keep_defaults() {
    let config = from_pairs(&[("HANDVOL_TICK_MS", ""), ("HANDVOL_SINK", "  ")]).unwrap();
    assert_eq!(config.tick_interval(), Duration::from_millis(10));
    assert_eq!(config.sink(), "@DEFAULT_SINK@");
}

#[test]
fn test_malformed_values_are_config_errors() {
    let cases = [
        ("HANDVOL_TICK_MS", "fast"),
        ("HANDVOL_TICK_MS", "0"),
        ("HANDVOL_SCORE_THRESHOLD", "high"),
        ("HANDVOL_SCORE_THRESHOLD", "1.5"),
        ("HANDVOL_LOG_LEVEL", "loud"),
        ("HANDVOL_DEVICE", "tpu"),
        ("HANDVOL_INPUT_LAYOUT", "chw"),
        ("HANDVOL_SCORE_ACTIVATION", "softmax"),
    ];
    for (key, value) in cases {
        let err = from_pairs(&[(key, value)]).unwrap_err();
        assert!(
            matches!(err, AppError::Config(ref msg) if msg.contains(key)),
            "{key}={value} gave {err}"
        );
    }
}

#[test]
fn test_camera_config_uses_device_at_vga() {
    let config = from_pairs(&[("HANDVOL_CAMERA_DEVICE", "/dev/video4")]).unwrap();
    let camera = config.camera_config();
    assert_eq!(camera.device(), "/dev/video4");
    assert_eq!((camera.width(), camera.height()), (640, 480));
}

#[test]
fn test_landmarker_config() {
    let config = from_pairs(&[
        ("HANDVOL_SCORE_THRESHOLD", "0.8"),
        ("HANDVOL_INPUT_LAYOUT", "NHWC"),
        ("HANDVOL_SCORE_ACTIVATION", "sigmoid"),
    ])
    .unwrap();
    let landmarker = config.landmarker_config();
    assert_eq!(landmarker.score_threshold, 0.8);
    assert_eq!(landmarker.layout, InputLayout::Nhwc);
    assert_eq!(landmarker.activation, ScoreActivation::Sigmoid);
}

#[test]
fn test_builders() {
    let config = AppConfig::default()
        .with_palm_model_path("p.onnx")
        .with_model_path("m.onnx")
        .with_sink("hdmi")
        .with_tick_interval(Duration::from_millis(5));
    assert_eq!(config.palm_model_path(), &PathBuf::from("p.onnx"));
    assert_eq!(config.model_path(), &PathBuf::from("m.onnx"));
    assert_eq!(config.sink(), "hdmi");
    assert_eq!(config.tick_interval(), Duration::from_millis(5));
}
