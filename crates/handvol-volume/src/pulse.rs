use crate::{MAX_LEVEL_DB, VolumeError, VolumeSink};
use libpulse_binding as pulse;
use libpulse_binding::callbacks::ListResult;
use libpulse_binding::context::introspect::Introspector;
use libpulse_binding::context::{Context, State};
use libpulse_binding::mainloop::standard::{IterateResult, Mainloop};
use libpulse_binding::operation::{Operation, State as OperationState};
use libpulse_binding::volume::{ChannelVolumes, Volume, VolumeDB};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const CLIENT_NAME: &str = "handvol";
const CONNECT_ITERATIONS: usize = 100;

/// An output sink as reported by the server.
#[derive(Clone, Debug, PartialEq)]
pub struct SinkDevice {
    pub name: String,
    pub description: String,
}

fn connect() -> Result<(Mainloop, Context), VolumeError> {
    let mut mainloop = Mainloop::new()
        .ok_or_else(|| VolumeError::Device("failed to create PulseAudio mainloop".to_string()))?;

    let mut context = Context::new(&mainloop, CLIENT_NAME)
        .ok_or_else(|| VolumeError::Device("failed to create PulseAudio context".to_string()))?;

    context
        .connect(None, pulse::context::FlagSet::NOFLAGS, None)
        .map_err(|e| VolumeError::Device(format!("failed to connect to PulseAudio: {e}")))?;

    for _ in 0..CONNECT_ITERATIONS {
        iterate(&mut mainloop)?;
        match context.get_state() {
            State::Ready => return Ok((mainloop, context)),
            State::Failed | State::Terminated => {
                return Err(VolumeError::Device(
                    "PulseAudio connection failed or terminated".to_string(),
                ));
            }
            _ => {}
        }
    }

    Err(VolumeError::Device(
        "PulseAudio server unavailable or connection timed out".to_string(),
    ))
}

fn iterate(mainloop: &mut Mainloop) -> Result<(), VolumeError> {
    match mainloop.iterate(true) {
        IterateResult::Success(_) => Ok(()),
        IterateResult::Quit(_) | IterateResult::Err(_) => Err(VolumeError::Device(
            "PulseAudio mainloop stopped".to_string(),
        )),
    }
}

fn wait_for<F: ?Sized>(mainloop: &mut Mainloop, op: &Operation<F>) -> Result<(), VolumeError> {
    loop {
        iterate(mainloop)?;
        match op.get_state() {
            OperationState::Done => return Ok(()),
            OperationState::Cancelled => {
                return Err(VolumeError::Operation("operation cancelled".to_string()));
            }
            OperationState::Running => {}
        }
    }
}

/// List the server's output sinks.
pub fn list_sinks() -> Result<Vec<SinkDevice>, VolumeError> {
    let (mut mainloop, mut context) = connect()?;

    let sinks = Rc::new(RefCell::new(Vec::new()));
    let collected = Rc::clone(&sinks);
    let op = context
        .introspect()
        .get_sink_info_list(move |result| {
            if let ListResult::Item(info) = result {
                if let (Some(name), Some(desc)) = (&info.name, &info.description) {
                    collected.borrow_mut().push(SinkDevice {
                        name: name.to_string(),
                        description: desc.to_string(),
                    });
                }
            }
        });
    let waited = wait_for(&mut mainloop, &op);
    context.disconnect();
    waited?;

    let result = sinks.borrow().clone();
    Ok(result)
}

/// Master volume of one PulseAudio sink.
///
/// Holds its own standard mainloop and drives it synchronously, so every
/// call blocks until the server has answered.
pub struct PulseVolume {
    introspect: Introspector,
    context: Context,
    mainloop: Mainloop,
    sink: String,
    channels: u8,
}

impl std::fmt::Debug for PulseVolume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PulseVolume")
            .field("sink", &self.sink)
            .field("channels", &self.channels)
            .finish()
    }
}

impl PulseVolume {
    /// Connect to the server and look up `sink` (e.g. `@DEFAULT_SINK@`).
    pub fn connect(sink: &str) -> Result<Self, VolumeError> {
        let (mut mainloop, context) = connect()?;
        let introspect = context.introspect();

        let channels = Rc::new(Cell::new(None));
        let found = Rc::clone(&channels);
        let op = introspect.get_sink_info_by_name(sink, move |result| {
            if let ListResult::Item(info) = result {
                found.set(Some(info.volume.len()));
            }
        });
        wait_for(&mut mainloop, &op)?;

        let channels = channels
            .get()
            .filter(|&n| n > 0)
            .ok_or_else(|| VolumeError::Device(format!("sink '{sink}' not found")))?;

        log::info!("volume control on sink '{sink}' ({channels} channels)");

        Ok(Self {
            introspect,
            context,
            mainloop,
            sink: sink.to_string(),
            channels,
        })
    }

    pub fn sink(&self) -> &str {
        &self.sink
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }
}

impl VolumeSink for PulseVolume {
    fn set_level(&mut self, db: f32) -> Result<(), VolumeError> {
        if !db.is_finite() {
            return Err(VolumeError::Operation(format!("invalid level {db} dB")));
        }
        let volume = Volume::from(VolumeDB(db.min(MAX_LEVEL_DB) as f64));
        let mut levels = ChannelVolumes::default();
        levels.set(self.channels, volume);

        let success = Rc::new(Cell::new(false));
        let flag = Rc::clone(&success);
        let op = self.introspect.set_sink_volume_by_name(
            &self.sink,
            &levels,
            Some(Box::new(move |ok| flag.set(ok))),
        );
        wait_for(&mut self.mainloop, &op)?;

        if success.get() {
            Ok(())
        } else {
            Err(VolumeError::Operation(format!(
                "server rejected volume {db:.2} dB on '{}'",
                self.sink
            )))
        }
    }
}

impl Drop for PulseVolume {
    fn drop(&mut self) {
        self.context.disconnect();
    }
}
