//! # Engine Traits
//!
//! ## Lifecycle
//!
//! ```text
//! ModuleEngine::can_play(path)        cheap header check
//! ModuleEngine::open(path, settings)  -> Box<dyn TrackerModule>
//! TrackerModule::read(...)*           interleaved stereo i16 frames
//! TrackerModule::seek(...)*
//! drop                                releases the engine handle
//! ```
//!
//! ## Threading Model
//!
//! An opened module is owned by exactly one adapter and used from one thread
//! at a time, so [`TrackerModule`] only requires `Send`. Engines are shared
//! by the factory and require `Send + Sync`.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

/// Modules are always rendered to interleaved stereo.
pub const OUTPUT_CHANNELS: u16 = 2;

/// Resampling filter used by the engine mixer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationFilter {
    /// Let the engine pick (currently 8-tap windowed sinc for libopenmpt).
    #[default]
    Default,
    /// No interpolation (zero-order hold).
    None,
    /// Linear interpolation.
    Linear,
    /// Cubic interpolation.
    Cubic,
    /// Windowed sinc with 8 taps.
    Sinc8,
}

impl InterpolationFilter {
    /// Filter length in taps, as the libopenmpt render parameter expects.
    pub fn taps(self) -> i32 {
        match self {
            InterpolationFilter::Default => 0,
            InterpolationFilter::None => 1,
            InterpolationFilter::Linear => 2,
            InterpolationFilter::Cubic => 4,
            InterpolationFilter::Sinc8 => 8,
        }
    }

    /// Inverse of [`taps`](Self::taps). Unknown lengths map to `Default`.
    pub fn from_taps(taps: i64) -> Self {
        match taps {
            1 => InterpolationFilter::None,
            2 => InterpolationFilter::Linear,
            4 => InterpolationFilter::Cubic,
            8 => InterpolationFilter::Sinc8,
            _ => InterpolationFilter::Default,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InterpolationFilter::Default => "Default",
            InterpolationFilter::None => "None",
            InterpolationFilter::Linear => "Linear",
            InterpolationFilter::Cubic => "Cubic",
            InterpolationFilter::Sinc8 => "Windowed sinc (8 taps)",
        }
    }

    pub const ALL: [InterpolationFilter; 5] = [
        InterpolationFilter::Default,
        InterpolationFilter::None,
        InterpolationFilter::Linear,
        InterpolationFilter::Cubic,
        InterpolationFilter::Sinc8,
    ];
}

/// Mixer parameters applied when a module is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Output sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Resampling filter.
    #[serde(default)]
    pub interpolation: InterpolationFilter,

    /// Stereo separation in percent. 0 is mono, 100 is the module's own
    /// panning, 200 exaggerates it.
    #[serde(default = "default_stereo_separation")]
    pub stereo_separation: u32,

    /// How many times the song is repeated after the first pass. The
    /// reported duration covers every pass.
    ///
    /// Always finite: an endlessly looping module would never reach end of
    /// stream.
    #[serde(default)]
    pub repeat_count: u32,
}

pub const MIN_SAMPLE_RATE: u32 = 8_000;
pub const MAX_SAMPLE_RATE: u32 = 192_000;
pub const MAX_STEREO_SEPARATION: u32 = 200;
pub const MAX_REPEAT_COUNT: u32 = 16;

fn default_sample_rate() -> u32 {
    44_100
}

fn default_stereo_separation() -> u32 {
    100
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            interpolation: InterpolationFilter::default(),
            stereo_separation: default_stereo_separation(),
            repeat_count: 0,
        }
    }
}

impl RenderSettings {
    /// Clamp every field into the range the engine accepts.
    pub fn clamped(self) -> Self {
        Self {
            sample_rate: self.sample_rate.clamp(MIN_SAMPLE_RATE, MAX_SAMPLE_RATE),
            interpolation: self.interpolation,
            stereo_separation: self.stereo_separation.min(MAX_STEREO_SEPARATION),
            repeat_count: self.repeat_count.min(MAX_REPEAT_COUNT),
        }
    }
}

/// Descriptive information about an opened module.
///
/// String fields are empty when the module does not carry them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    /// Short format identifier (`"it"`, `"xm"`, ...).
    pub format_id: String,
    /// Human-readable format name (`"Impulse Tracker"`).
    pub format_name: String,
    /// Container the module was wrapped in, if any (`"umx"`, `"j2b"`).
    pub container: String,
    /// Tracker software that saved the file.
    pub tracker: String,
    pub title: String,
    pub artist: String,
    pub date: String,
    /// Song message / comments.
    pub message: String,

    pub channels: u32,
    pub patterns: u32,
    pub orders: u32,
    pub instruments: u32,
    pub samples: u32,
    pub subsongs: u32,

    pub instrument_names: Vec<String>,
    pub sample_names: Vec<String>,
}

/// One opened module.
pub trait TrackerModule: Send {
    /// Length of the rendered stream, counting every repeat pass requested
    /// through [`RenderSettings::repeat_count`].
    fn duration(&self) -> Duration;

    /// Embedded song title. Empty when the module has none.
    fn title(&self) -> String;

    /// Descriptive information for metadata display.
    fn info(&self) -> ModuleInfo;

    /// Render up to `buf.len() / 2` interleaved stereo frames at
    /// `sample_rate`, returning the number of frames written.
    ///
    /// Returns 0 at the end of the song.
    fn read(&mut self, sample_rate: u32, buf: &mut [i16]) -> usize;

    /// Jump to `position` in the stream, returning the position actually
    /// reached. Positions past [`duration`](Self::duration) land at the end.
    fn seek(&mut self, position: Duration) -> Duration;

    /// Current position in the stream, counting earlier repeat passes.
    fn position(&self) -> Duration;
}

/// Factory side of the engine.
pub trait ModuleEngine: Send + Sync {
    /// Name shown in logs.
    fn name(&self) -> &str;

    /// Whether the engine recognizes the file at `path`.
    fn can_play(&self, path: &Path) -> bool;

    /// Open `path` and apply `settings`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidFile`](crate::EngineError::InvalidFile) if
    ///   the engine rejects the file
    /// - [`EngineError::Io`](crate::EngineError::Io) if it cannot be read
    fn open(&self, path: &Path, settings: &RenderSettings) -> Result<Box<dyn TrackerModule>>;
}
