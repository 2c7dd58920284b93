use handvol_base::Vec2;
use handvol_volume::{MAX_LEVEL_DB, MIN_LEVEL_DB};
use std::fmt;

/// Pinch distances (px) that span the whole output range.
pub const PINCH_RANGE: (f32, f32) = (30.0, 300.0);
/// Master level range in dB.
pub const VOLUME_RANGE: (f32, f32) = (MIN_LEVEL_DB, MAX_LEVEL_DB);
/// Bar top y coordinate: 400 px when quiet, 150 px when loud.
pub const BAR_RANGE: (f32, f32) = (400.0, 150.0);

#[derive(Debug, Clone, PartialEq)]
pub enum MapError {
    InvalidInputRange { start: f32, end: f32 },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::InvalidInputRange { start, end } => {
                write!(f, "input range must be increasing, got {start}..{end}")
            }
        }
    }
}

impl std::error::Error for MapError {}

/// Clamped linear interpolation from an input range onto an output range.
///
/// Inputs at or below `input.0` give `output.0`, inputs at or above
/// `input.1` give `output.1`. The output range may run backwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearMap {
    input: (f32, f32),
    output: (f32, f32),
}

impl LinearMap {
    pub fn new(input: (f32, f32), output: (f32, f32)) -> Result<Self, MapError> {
        if !(input.0 < input.1) {
            return Err(MapError::InvalidInputRange {
                start: input.0,
                end: input.1,
            });
        }
        Ok(Self { input, output })
    }

    pub fn input(&self) -> (f32, f32) {
        self.input
    }

    pub fn output(&self) -> (f32, f32) {
        self.output
    }

    pub fn apply(&self, value: f32) -> f32 {
        let (x0, x1) = self.input;
        let (y0, y1) = self.output;
        if value <= x0 {
            y0
        } else if value >= x1 {
            y1
        } else {
            y0 + (value - x0) * (y1 - y0) / (x1 - x0)
        }
    }
}

/// Everything derived from one hand in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureReading {
    pub thumb: Vec2<i32>,
    pub index: Vec2<i32>,
    /// Pixel distance between the two fingertips.
    pub distance: f32,
    /// Target master level in dB.
    pub level_db: f32,
    /// Top edge of the filled volume bar.
    pub bar_top: f32,
}

/// Maps a thumb/index pinch to a volume level and a bar height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureMapper {
    volume: LinearMap,
    bar: LinearMap,
}

impl Default for GestureMapper {
    fn default() -> Self {
        Self {
            volume: LinearMap {
                input: PINCH_RANGE,
                output: VOLUME_RANGE,
            },
            bar: LinearMap {
                input: PINCH_RANGE,
                output: BAR_RANGE,
            },
        }
    }
}

impl GestureMapper {
    pub fn new(volume: LinearMap, bar: LinearMap) -> Self {
        Self { volume, bar }
    }

    pub fn read(&self, thumb: Vec2<i32>, index: Vec2<i32>) -> GestureReading {
        let distance = thumb.distance(index);
        GestureReading {
            thumb,
            index,
            distance,
            level_db: self.volume.apply(distance),
            bar_top: self.bar.apply(distance),
        }
    }
}
