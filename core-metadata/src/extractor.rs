//! Module Information Extraction
//!
//! Turns the engine's [`ModuleInfo`] into the two label/value tables the
//! host's file information dialog shows.
//!
//! ## Overview
//!
//! - Audio properties: length, output rate, channel and pattern counts
//! - Descriptions: title, artist, tracker, date, song message, and the
//!   instrument and sample name lists (trackers often hide the real song
//!   notes there)
//! - Empty fields and zero counts are left out
//!
//! ## Usage
//!
//! ```ignore
//! use core_metadata::extractor::ModuleInfoExtractor;
//!
//! let extractor = ModuleInfoExtractor::new(&engine, RenderSettings::default());
//! let extracted = extractor.extract_from_file(Path::new("song.xm"))?;
//! println!("{:?}", extracted.descriptions.get(labels::TITLE));
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use core_engine::{ModuleEngine, ModuleInfo, RenderSettings, TrackerModule};
use tracing::debug;

use crate::error::Result;

/// Labels used in the host dialog.
pub mod labels {
    pub const LENGTH: &str = "Length";
    pub const SAMPLE_RATE: &str = "Sample rate";
    pub const CHANNELS: &str = "Channels";
    pub const FORMAT: &str = "Format";
    pub const CONTAINER: &str = "Container";
    pub const PATTERNS: &str = "Patterns";
    pub const ORDERS: &str = "Orders";
    pub const INSTRUMENTS: &str = "Instruments";
    pub const SAMPLES: &str = "Samples";
    pub const SUBSONGS: &str = "Subsongs";

    pub const TITLE: &str = "Title";
    pub const ARTIST: &str = "Artist";
    pub const TRACKER: &str = "Tracker";
    pub const DATE: &str = "Date";
    pub const COMMENT: &str = "Comment";
    pub const INSTRUMENT_NAMES: &str = "Instrument names";
    pub const SAMPLE_NAMES: &str = "Sample names";
}

/// Both tables for one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedModuleInfo {
    pub audio_properties: HashMap<String, String>,
    pub descriptions: HashMap<String, String>,
}

/// Opens modules through an engine and builds their information tables.
pub struct ModuleInfoExtractor<'a> {
    engine: &'a dyn ModuleEngine,
    settings: RenderSettings,
}

impl<'a> ModuleInfoExtractor<'a> {
    pub fn new(engine: &'a dyn ModuleEngine, settings: RenderSettings) -> Self {
        Self {
            engine,
            settings: settings.clamped(),
        }
    }

    /// Open `path`, read its information and release the module again.
    pub fn extract_from_file(&self, path: &Path) -> Result<ExtractedModuleInfo> {
        let module = self.engine.open(path, &self.settings)?;
        let extracted = self.extract(module.as_ref());
        debug!(
            path = %path.display(),
            properties = extracted.audio_properties.len(),
            descriptions = extracted.descriptions.len(),
            "Extracted module information"
        );
        Ok(extracted)
    }

    /// Build both tables from an opened module.
    pub fn extract(&self, module: &dyn TrackerModule) -> ExtractedModuleInfo {
        let info = module.info();
        ExtractedModuleInfo {
            audio_properties: audio_properties(
                &info,
                module.duration(),
                self.settings.sample_rate,
            ),
            descriptions: descriptions(&info),
        }
    }
}

fn audio_properties(
    info: &ModuleInfo,
    length: Duration,
    sample_rate: u32,
) -> HashMap<String, String> {
    let mut table = Table::default();

    table.insert(labels::LENGTH, format_length(length));
    table.insert(labels::SAMPLE_RATE, format!("{} Hz", sample_rate));
    table.count(labels::CHANNELS, info.channels);
    table.insert(labels::FORMAT, format_name(info));
    table.insert(labels::CONTAINER, info.container.to_ascii_uppercase());
    table.count(labels::PATTERNS, info.patterns);
    table.count(labels::ORDERS, info.orders);
    table.count(labels::INSTRUMENTS, info.instruments);
    table.count(labels::SAMPLES, info.samples);
    table.count(labels::SUBSONGS, info.subsongs);

    table.0
}

fn descriptions(info: &ModuleInfo) -> HashMap<String, String> {
    let mut table = Table::default();

    table.insert(labels::TITLE, normalize_text(&info.title));
    table.insert(labels::ARTIST, normalize_text(&info.artist));
    table.insert(labels::TRACKER, normalize_text(&info.tracker));
    table.insert(labels::DATE, normalize_text(&info.date));
    table.insert(labels::COMMENT, info.message.trim().to_string());
    table.insert(labels::INSTRUMENT_NAMES, join_names(&info.instrument_names));
    table.insert(labels::SAMPLE_NAMES, join_names(&info.sample_names));

    table.0
}

/// Label/value table that drops empty values.
#[derive(Default)]
struct Table(HashMap<String, String>);

impl Table {
    fn insert(&mut self, label: &str, value: String) {
        if !value.is_empty() {
            self.0.insert(label.to_string(), value);
        }
    }

    fn count(&mut self, label: &str, value: u32) {
        if value > 0 {
            self.0.insert(label.to_string(), value.to_string());
        }
    }
}

/// Format a length as `m:ss`. Minutes are not wrapped into hours.
pub fn format_length(length: Duration) -> String {
    let secs = length.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn format_name(info: &ModuleInfo) -> String {
    let id = info.format_id.to_ascii_uppercase();
    match (info.format_name.is_empty(), id.is_empty()) {
        (false, false) => format!("{} ({})", info.format_name, id),
        (false, true) => info.format_name.clone(),
        (true, _) => id,
    }
}

/// Trim and collapse whitespace, drop control characters.
///
/// Tracker files pad names with spaces and sometimes NULs.
pub(crate) fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .filter(|c| !c.is_control())
        .collect()
}

fn join_names(names: &[String]) -> String {
    names
        .iter()
        .map(|name| normalize_text(name))
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
