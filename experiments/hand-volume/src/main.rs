use hand_volume::{AppConfig, Pipeline, open_sink_or_unavailable, shell};
use handvol_base::{init_file_logger_with_level, init_stdout_logger_with_level, logging};
use handvol_camera::V4l2Camera;
use handvol_infer::{Backend, HandLandmarker, ModelSource, OnnxBackend};
use handvol_volume::{PulseVolume, list_sinks};
use log::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    let level = config.log_level().unwrap_or_else(logging::default_level);
    match config.log_dir() {
        Some(dir) => init_file_logger_with_level(dir.clone(), level)?,
        None => init_stdout_logger_with_level(level),
    }

    info!("Hand Gesture Volume Control");
    info!("Palm model: {}", config.palm_model_path().display());
    info!("Landmark model: {}", config.model_path().display());
    info!("Camera: {}", config.camera_device());
    info!("Inference device: {}", config.device());
    info!("Controls: Exit button or ESC to quit");

    match list_sinks() {
        Ok(sinks) => {
            for sink in sinks {
                info!("Output sink: {} ({})", sink.name, sink.description);
            }
        }
        Err(e) => warn!("Could not list output sinks: {e}"),
    }
    let sink_name = config.sink().to_string();
    let sink = open_sink_or_unavailable(|| PulseVolume::connect(&sink_name));

    info!("Loading hand models...");
    let backend = OnnxBackend::new(config.device());
    info!("Using {} backend", backend.name());
    let detector = HandLandmarker::new(
        ModelSource::File(config.palm_model_path().clone()),
        ModelSource::File(config.model_path().clone()),
        &backend,
    )?
    .with_config(config.landmarker_config());
    info!("Models loaded");

    info!("Opening camera...");
    let camera = V4l2Camera::new(config.camera_config())?;
    let (width, height) = camera.resolution();
    info!("Camera ready at {width}x{height}");

    let pipeline = Pipeline::new(camera, detector, sink);
    shell::run(pipeline, config.tick_interval()).await?;

    info!("Exiting...");
    Ok(())
}
