//! System master-volume control for handvol.
//!
//! [`VolumeSink`] is the single write-only operation the app needs. The
//! PulseAudio implementation is behind the `pulse` feature; when it cannot be
//! opened, [`UnavailableSink`] takes its place so the failure shows up on
//! first use instead of at startup.

pub mod error;
pub mod sink;

#[cfg(feature = "pulse")]
pub mod pulse;

pub use error::VolumeError;
pub use sink::{MAX_LEVEL_DB, MIN_LEVEL_DB, UnavailableSink, VolumeSink};

#[cfg(feature = "pulse")]
pub use pulse::{PulseVolume, SinkDevice, list_sinks};
