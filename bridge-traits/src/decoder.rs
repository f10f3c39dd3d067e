//! Decoder plugin contract.
//!
//! A host loads a plugin by asking its [`DecoderFactory`] whether a file is
//! supported, then creates a [`Decoder`] for that file and drives it from the
//! decode thread:
//!
//! ```text
//! supports(path) -> create(path) -> initialize() -> read()* / seek()* -> drop
//! ```

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::metadata::{FileInfo, MetaDataModel};

/// Layout of the PCM bytes a decoder writes into the host buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    /// Signed 16-bit little-endian, interleaved.
    S16Le,
    /// Signed 24-bit little-endian in 32-bit containers, interleaved.
    S24Le,
    /// Signed 32-bit little-endian, interleaved.
    S32Le,
    /// 32-bit float little-endian, interleaved.
    F32Le,
}

impl SampleFormat {
    /// Size of one sample of one channel, in bytes.
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::S16Le => 2,
            SampleFormat::S24Le | SampleFormat::S32Le | SampleFormat::F32Le => 4,
        }
    }

    /// Significant bits per sample.
    pub fn bits_per_sample(self) -> u32 {
        match self {
            SampleFormat::S16Le => 16,
            SampleFormat::S24Le => 24,
            SampleFormat::S32Le | SampleFormat::F32Le => 32,
        }
    }
}

/// Output format a decoder announces from [`Decoder::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioParameters {
    /// Sample rate in hertz.
    pub sample_rate: u32,
    /// Number of interleaved channels.
    pub channels: u16,
    /// Sample layout.
    pub format: SampleFormat,
}

impl AudioParameters {
    pub fn new(sample_rate: u32, channels: u16, format: SampleFormat) -> Self {
        Self {
            sample_rate,
            channels,
            format,
        }
    }

    /// Size of one frame (one sample for every channel), in bytes.
    pub fn frame_size(&self) -> usize {
        self.format.bytes_per_sample() * self.channels as usize
    }

    /// Nominal bitrate of the raw PCM stream in kbps.
    pub fn pcm_bitrate_kbps(&self) -> u32 {
        self.sample_rate * u32::from(self.channels) * self.format.bits_per_sample() / 1000
    }
}

/// A decoder bound to one input file.
///
/// The host calls these methods sequentially from its decode thread.
pub trait Decoder: Send {
    /// Open the input and prepare for decoding.
    ///
    /// Returns the output format on success. Any failure means the file is
    /// unsupported or corrupt, and the host will not call the other methods.
    fn initialize(&mut self) -> Result<AudioParameters>;

    /// Total duration of the stream. Zero when unknown or not initialized.
    fn total_time(&self) -> Duration;

    /// Bitrate in kbps.
    fn bitrate(&self) -> u32;

    /// Decode into `buf`, returning the number of bytes written.
    ///
    /// Returns 0 at end of stream.
    fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Reposition playback. Out-of-range positions are clamped.
    fn seek(&mut self, position: Duration);
}

/// Static description of a decoder plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderProperties {
    /// Display name.
    pub name: String,
    /// Short unique identifier, also used as the settings key prefix.
    pub short_name: String,
    /// Glob patterns of the handled files (e.g. `*.mod`).
    pub filters: Vec<String>,
    /// Description shown next to the filters in file dialogs.
    pub description: String,
    /// URL schemes the plugin can open.
    pub protocols: Vec<String>,
    /// The plugin provides an about box.
    pub has_about: bool,
    /// The plugin provides a settings dialog.
    pub has_settings: bool,
    /// The plugin reads files itself and never takes a host input stream.
    pub no_input: bool,
}

/// Contents of a plugin about box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AboutInfo {
    pub title: String,
    pub text: String,
}

/// Kind and default value of a user-editable plugin setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SettingKind {
    Toggle { default: bool },
    Choice { options: Vec<(i64, String)>, default: i64 },
    Range { min: i64, max: i64, default: i64 },
}

/// A field of the plugin settings dialog, persisted under `key` in the
/// host [`SettingsStore`](crate::storage::SettingsStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingDescriptor {
    pub key: String,
    pub label: String,
    pub kind: SettingKind,
}

/// Entry point of a decoder plugin.
pub trait DecoderFactory: Send + Sync {
    /// Whether this plugin can play the file at `path`.
    fn supports(&self, path: &Path) -> bool;

    /// Whether this plugin can decode a host-provided stream.
    fn can_decode(&self, input: &mut dyn Read) -> bool;

    fn properties(&self) -> DecoderProperties;

    /// Create a decoder for `path`. The decoder does not touch the file
    /// until [`Decoder::initialize`] is called.
    fn create(&self, path: &Path) -> Box<dyn Decoder>;

    /// Build playlist entries for `path`.
    ///
    /// Returns an empty list when the file cannot be opened. Paths pushed to
    /// `ignored_paths` are skipped by the host when it scans directories.
    fn create_playlist(
        &self,
        path: &Path,
        use_metadata: bool,
        ignored_paths: &mut Vec<PathBuf>,
    ) -> Vec<FileInfo>;

    fn create_metadata_model(&self, path: &Path) -> Box<dyn MetaDataModel>;

    fn about(&self) -> AboutInfo;

    /// Fields of the settings dialog. Empty when the plugin has none.
    fn settings(&self) -> Vec<SettingDescriptor> {
        Vec::new()
    }
}
