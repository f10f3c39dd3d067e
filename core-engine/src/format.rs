//! # Supported Formats
//!
//! The file types announced to the host, and extension-based helpers the
//! host can use as a routing hint before asking the engine.

use std::path::Path;
use tracing::debug;

/// A module file type the plugin announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleFormat {
    /// Lowercase file extension without the dot.
    pub extension: &'static str,
    /// Format name for display.
    pub name: &'static str,
}

const fn format(extension: &'static str, name: &'static str) -> ModuleFormat {
    ModuleFormat { extension, name }
}

/// Every file type the plugin routes to the engine, sorted by extension.
pub const SUPPORTED_FORMATS: &[ModuleFormat] = &[
    format("669", "Composer 669 / UNIS 669"),
    format("amf", "ASYLUM / DSMI Advanced Music Format"),
    format("dbm", "DigiBooster Pro"),
    format("digi", "DigiBooster 1.x"),
    format("emod", "Quadra Composer"),
    format("far", "Farandole Composer"),
    format("fnk", "Funktracker"),
    format("gdm", "General Digital Music"),
    format("gmc", "Game Music Creator"),
    format("imf", "Imago Orpheus"),
    format("ims", "Images Music System"),
    format("it", "Impulse Tracker"),
    format("j2b", "Jazz Jackrabbit 2 Music"),
    format("liq", "Liquid Tracker"),
    format("mdl", "Digitrakker"),
    format("med", "OctaMED"),
    format("mgt", "Megatracker"),
    format("mod", "ProTracker"),
    format("mtm", "MultiTracker"),
    format("ntp", "Novotrade Packer"),
    format("oct", "Octalyser"),
    format("okta", "Oktalyzer"),
    format("psm", "Epic MegaGames MASI"),
    format("ptm", "PolyTracker"),
    format("rad", "Reality Adlib Tracker"),
    format("rtm", "Real Tracker 2"),
    format("s3m", "Scream Tracker 3"),
    format("stm", "Scream Tracker 2"),
    format("ult", "UltraTracker"),
    format("umx", "Unreal Music Package"),
    format("xm", "FastTracker 2"),
];

/// Formats from the Amiga, where the type was written as a file name prefix
/// (`mod.jester`, `med.ramchip`).
const AMIGA_PREFIXES: &[&str] = &["dbm", "digi", "emod", "gmc", "ims", "med", "mod", "okta"];

/// Extensions of common non-module files. A prefix match never overrides
/// one of these (`mod.mp3` is an MP3).
const OTHER_EXTENSIONS: &[&str] = &[
    "7z", "aac", "aif", "aiff", "ape", "bak", "bmp", "cue", "doc", "exe", "flac", "gif", "gz",
    "htm", "html", "ico", "jpeg", "jpg", "json", "lha", "lzh", "m3u", "m3u8", "m4a", "md", "mid",
    "midi", "mp2", "mp3", "mp4", "nfo", "ogg", "opus", "pdf", "pls", "png", "rar", "sid", "svg",
    "tar", "tif", "tiff", "txt", "wav", "webp", "wma", "wv", "xml", "xz", "zip",
];

/// Extension-based format lookup.
///
/// This is a hint only: the authoritative answer comes from
/// [`ModuleEngine::can_play`](crate::ModuleEngine::can_play), which looks at
/// the file contents.
pub struct FormatDetector;

impl FormatDetector {
    /// Look up the format of `path`.
    ///
    /// Matches the extension first, then the Amiga naming convention where
    /// the type is a prefix (`mod.jester`). The prefix form only applies to
    /// Amiga formats and never to a name ending in a common non-module
    /// extension.
    ///
    /// # Example
    ///
    /// ```rust
    /// use core_engine::FormatDetector;
    /// use std::path::Path;
    ///
    /// let format = FormatDetector::detect(Path::new("/mods/2ND_PM.S3M")).unwrap();
    /// assert_eq!(format.extension, "s3m");
    /// assert!(FormatDetector::detect(Path::new("song.mp3")).is_none());
    /// assert!(FormatDetector::detect(Path::new("mod.mp3")).is_none());
    /// ```
    pub fn detect(path: &Path) -> Option<&'static ModuleFormat> {
        let file_name = path.file_name()?.to_str()?.to_ascii_lowercase();

        let by_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| Self::lookup(&ext.to_ascii_lowercase()));
        if by_extension.is_some() {
            return by_extension;
        }

        let (prefix, rest) = file_name.split_once('.')?;
        if rest.is_empty() || !AMIGA_PREFIXES.contains(&prefix) {
            return None;
        }
        let extension = rest.rsplit('.').next().unwrap_or(rest);
        if OTHER_EXTENSIONS.contains(&extension) {
            return None;
        }
        let found = Self::lookup(prefix);
        if found.is_some() {
            debug!(file = %file_name, "Matched Amiga-style format prefix");
        }
        found
    }

    /// Whether the path looks like a supported module by name alone.
    pub fn has_supported_name(path: &Path) -> bool {
        Self::detect(path).is_some()
    }

    /// Look up a format by lowercase extension.
    pub fn lookup(extension: &str) -> Option<&'static ModuleFormat> {
        SUPPORTED_FORMATS
            .binary_search_by(|format| format.extension.cmp(extension))
            .ok()
            .map(|index| &SUPPORTED_FORMATS[index])
    }

    /// Host file-dialog filters (`*.mod`, `*.xm`, ...).
    pub fn filters() -> Vec<String> {
        SUPPORTED_FORMATS
            .iter()
            .map(|format| format!("*.{}", format.extension))
            .collect()
    }
}
