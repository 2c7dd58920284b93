use crate::{Camera, CameraConfig, CameraError, decode_mjpeg, yuyv_to_rgb};
use handvol_base::Tensor;
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc;
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

type FrameResult = Result<Tensor<u8>, CameraError>;

/// Pixel formats the capture loop knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PixelFormat {
    Mjpeg,
    Yuyv,
}

impl PixelFormat {
    fn fourcc(self) -> FourCC {
        match self {
            PixelFormat::Mjpeg => FourCC::new(b"MJPG"),
            PixelFormat::Yuyv => FourCC::new(b"YUYV"),
        }
    }
}

/// V4L2 webcam.
///
/// Frames are read on a background thread and handed over through a bounded
/// channel; the thread starts on the first `recv` and stops when the camera is
/// dropped.
pub struct V4l2Camera {
    config: CameraConfig,
    format: PixelFormat,
    width: u32,
    height: u32,
    device: Option<Device>,
    receiver: Option<mpsc::Receiver<FrameResult>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for V4l2Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4l2Camera")
            .field("config", &self.config)
            .field("format", &self.format)
            .field("resolution", &(self.width, self.height))
            .field("running", &self.thread_handle.is_some())
            .finish()
    }
}

impl Camera for V4l2Camera {
    async fn recv(&mut self) -> Result<Tensor<u8>, CameraError> {
        self.ensure_started()?;

        let receiver = self
            .receiver
            .as_mut()
            .ok_or_else(|| CameraError::Channel("receiver not initialized".to_string()))?;

        receiver
            .recv()
            .await
            .ok_or_else(|| CameraError::Channel("capture thread stopped".to_string()))?
    }
}

impl Drop for V4l2Camera {
    fn drop(&mut self) {
        // Closing the channel makes the capture thread's next send fail.
        drop(self.receiver.take());

        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
        log::debug!("released camera {}", self.config.device());
    }
}

impl V4l2Camera {
    /// Open `config.device()` at the requested resolution.
    ///
    /// MJPEG is preferred; YUYV is accepted when the driver refuses MJPEG.
    /// The driver may pick a different resolution, which then stays fixed for
    /// the session.
    pub fn new(config: CameraConfig) -> Result<Self, CameraError> {
        let device = Device::with_path(config.device())?;

        let mut negotiated = None;
        for format in [PixelFormat::Mjpeg, PixelFormat::Yuyv] {
            let wanted = Format::new(config.width(), config.height(), format.fourcc());
            let got = Capture::set_format(&device, &wanted)?;
            if got.fourcc == format.fourcc() {
                negotiated = Some((format, got.width, got.height));
                break;
            }
        }
        let (format, width, height) = negotiated.ok_or_else(|| {
            CameraError::Device("device supports neither MJPEG nor YUYV".to_string())
        })?;

        let params = v4l::video::capture::Parameters::with_fps(config.fps());
        Capture::set_params(&device, &params)?;

        if width != config.width() || height != config.height() {
            log::warn!(
                "requested {}x{}, device chose {}x{}",
                config.width(),
                config.height(),
                width,
                height
            );
        }
        log::info!(
            "opened {} as {:?} {}x{}",
            config.device(),
            format,
            width,
            height
        );

        Ok(Self {
            config,
            format,
            width,
            height,
            device: Some(device),
            receiver: None,
            thread_handle: None,
        })
    }

    fn ensure_started(&mut self) -> Result<(), CameraError> {
        if self.receiver.is_some() {
            return Ok(());
        }

        let device = self
            .device
            .take()
            .ok_or_else(|| CameraError::Device("device already consumed".to_string()))?;

        let buffer_count = self.config.buffer_count();
        let (tx, rx) = mpsc::channel(buffer_count as usize);
        let (format, width, height) = (self.format, self.width, self.height);

        let handle = thread::spawn(move || {
            if let Err(e) = Self::capture_loop(device, tx, buffer_count, format, width, height) {
                log::error!("capture thread stopped: {e}");
            }
        });

        self.receiver = Some(rx);
        self.thread_handle = Some(handle);
        Ok(())
    }

    fn capture_loop(
        device: Device,
        tx: mpsc::Sender<FrameResult>,
        buffer_count: u32,
        format: PixelFormat,
        width: u32,
        height: u32,
    ) -> Result<(), CameraError> {
        let mut stream = MmapStream::with_buffers(&device, Type::VideoCapture, buffer_count)?;

        loop {
            let (buf, meta) = CaptureStream::next(&mut stream)?;
            let used = (meta.bytesused as usize).min(buf.len());
            let bytes = if used == 0 { buf } else { &buf[..used] };

            // Decode failures are per-frame; the loop keeps going.
            let frame = match format {
                PixelFormat::Mjpeg => decode_mjpeg(bytes),
                PixelFormat::Yuyv => yuyv_to_rgb(bytes, width, height)
                    .ok_or_else(|| CameraError::Decode("short YUYV frame".to_string()))
                    .and_then(|rgb| Ok(Tensor::from_rgb(width as usize, height as usize, rgb)?)),
            };

            if tx.blocking_send(frame).is_err() {
                break;
            }
        }

        Ok(())
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Resolution negotiated with the driver.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
