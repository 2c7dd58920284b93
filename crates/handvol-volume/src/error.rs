use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum VolumeError {
    /// The sink was never opened; carries the original failure.
    Unavailable(String),
    Device(String),
    Operation(String),
}

impl fmt::Display for VolumeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeError::Unavailable(msg) => write!(f, "volume control unavailable: {msg}"),
            VolumeError::Device(msg) => write!(f, "device error: {msg}"),
            VolumeError::Operation(msg) => write!(f, "operation failed: {msg}"),
        }
    }
}

impl std::error::Error for VolumeError {}
