use handvol_camera::CameraError;
use handvol_infer::InferError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(String),
    Camera(CameraError),
    Infer(InferError),
    Window(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "configuration error: {msg}"),
            AppError::Camera(e) => write!(f, "camera error: {e}"),
            AppError::Infer(e) => write!(f, "inference error: {e}"),
            AppError::Window(msg) => write!(f, "window error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Camera(e) => Some(e),
            AppError::Infer(e) => Some(e),
            AppError::Config(_) | AppError::Window(_) => None,
        }
    }
}

impl From<CameraError> for AppError {
    fn from(e: CameraError) -> Self {
        AppError::Camera(e)
    }
}

impl From<InferError> for AppError {
    fn from(e: InferError) -> Self {
        AppError::Infer(e)
    }
}

impl From<minifb::Error> for AppError {
    fn from(e: minifb::Error) -> Self {
        AppError::Window(e.to_string())
    }
}
