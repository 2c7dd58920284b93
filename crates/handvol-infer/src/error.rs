use crate::Device;
use std::fmt;

#[derive(Debug)]
pub enum InferError {
    ShapeMismatch { expected: String, got: String },
    ModelLoad(String),
    InvalidInput { name: String, expected_names: Vec<String> },
    MissingOutput(String),
    UnsupportedDevice(Device),
    UnsupportedDtype(String),
    BackendError(String),
}

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {expected}, got {got}")
            }
            InferError::ModelLoad(msg) => write!(f, "model load error: {msg}"),
            InferError::InvalidInput {
                name,
                expected_names,
            } => write!(f, "unknown input '{name}', model expects {expected_names:?}"),
            InferError::MissingOutput(msg) => write!(f, "missing output: {msg}"),
            InferError::UnsupportedDevice(device) => write!(f, "unsupported device: {device}"),
            InferError::UnsupportedDtype(msg) => write!(f, "unsupported dtype: {msg}"),
            InferError::BackendError(msg) => write!(f, "backend error: {msg}"),
        }
    }
}

impl std::error::Error for InferError {}

impl From<handvol_base::TensorError> for InferError {
    fn from(err: handvol_base::TensorError) -> Self {
        InferError::BackendError(format!("tensor error: {err}"))
    }
}
