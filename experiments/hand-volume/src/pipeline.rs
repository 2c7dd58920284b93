//! One tick of the capture → detect → map → volume → render chain.

use crate::error::AppError;
use crate::mapper::{GestureMapper, GestureReading};
use crate::render::{HandOverlay, render};
use handvol_base::Tensor;
use handvol_camera::Camera;
use handvol_infer::{HandLandmarkIndex, LandmarkDetector};
use handvol_volume::{UnavailableSink, VolumeError, VolumeSink};
use log::{debug, error, warn};

/// Result of a single tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No frame this tick; nothing was drawn and the volume was not touched.
    Skipped,
    Rendered(RenderedFrame),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    /// Display-sized image with overlays.
    pub image: Tensor<u8>,
    /// One reading per detected hand, in detection order.
    pub readings: Vec<GestureReading>,
    /// How many `set_level` calls failed this tick.
    pub volume_failures: usize,
}

pub struct Pipeline<C, D, S> {
    camera: C,
    detector: D,
    sink: S,
    mapper: GestureMapper,
}

impl<C: Camera, D: LandmarkDetector, S: VolumeSink> Pipeline<C, D, S> {
    pub fn new(camera: C, detector: D, sink: S) -> Self {
        Self {
            camera,
            detector,
            sink,
            mapper: GestureMapper::default(),
        }
    }

    pub fn with_mapper(mut self, mapper: GestureMapper) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn mapper(&self) -> &GestureMapper {
        &self.mapper
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Pull one frame and push it through the chain.
    ///
    /// Capture failures and malformed frames skip the tick. Detector errors
    /// are returned. Volume failures are logged and counted.
    pub async fn tick(&mut self) -> Result<TickOutcome, AppError> {
        let frame = match self.camera.recv().await {
            Ok(frame) => frame,
            Err(e) => {
                debug!("Frame capture failed, skipping tick: {e}");
                return Ok(TickOutcome::Skipped);
            }
        };

        if frame.ndim() != 3 || frame.channels() != 3 {
            warn!("Expected [H, W, 3] frame, got {:?}", frame.shape);
            return Ok(TickOutcome::Skipped);
        }

        let hands = self.detector.detect(&frame)?;
        let (width, height) = (frame.width(), frame.height());

        let mut overlays = Vec::with_capacity(hands.len());
        let mut volume_failures = 0;
        for hand in hands {
            let thumb = hand.pixel(HandLandmarkIndex::ThumbTip, width, height);
            let index = hand.pixel(HandLandmarkIndex::IndexFingerTip, width, height);
            let reading = self.mapper.read(thumb, index);

            if let Err(e) = self.sink.set_level(reading.level_db) {
                report_volume_failure(&e);
                volume_failures += 1;
            }

            overlays.push(HandOverlay { hand, reading });
        }

        let readings = overlays.iter().map(|o| o.reading).collect();
        Ok(TickOutcome::Rendered(RenderedFrame {
            image: render(frame, &overlays),
            readings,
            volume_failures,
        }))
    }
}

fn report_volume_failure(e: &VolumeError) {
    match e {
        VolumeError::Unavailable(_) => error!("Failed to set volume: {e}"),
        _ => warn!("Failed to set volume: {e}"),
    }
}

/// Open a volume sink, falling back to [`UnavailableSink`] when that fails.
///
/// The failure is logged here and reported again on every later write.
pub fn open_sink_or_unavailable<S, F>(open: F) -> Box<dyn VolumeSink>
where
    S: VolumeSink + 'static,
    F: FnOnce() -> Result<S, VolumeError>,
{
    match open() {
        Ok(sink) => Box::new(sink),
        Err(e) => {
            warn!("Volume control unavailable: {e}");
            Box::new(UnavailableSink::new(e.to_string()))
        }
    }
}
