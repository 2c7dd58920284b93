use crate::VolumeError;

/// Quietest master level the gesture mapping produces, in dB.
pub const MIN_LEVEL_DB: f32 = -65.25;
/// Loudest master level (unity gain), in dB.
pub const MAX_LEVEL_DB: f32 = 0.0;

/// Write-only master volume.
pub trait VolumeSink {
    /// Set the master output level in decibels (0.0 is full volume).
    fn set_level(&mut self, db: f32) -> Result<(), VolumeError>;
}

impl<S: VolumeSink + ?Sized> VolumeSink for Box<S> {
    fn set_level(&mut self, db: f32) -> Result<(), VolumeError> {
        (**self).set_level(db)
    }
}

/// Placeholder for a sink that failed to open. Every write fails.
#[derive(Debug, Clone)]
pub struct UnavailableSink {
    reason: String,
}

impl UnavailableSink {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl VolumeSink for UnavailableSink {
    fn set_level(&mut self, _db: f32) -> Result<(), VolumeError> {
        Err(VolumeError::Unavailable(self.reason.clone()))
    }
}
