//! Playlist entries and file information models.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Metadata fields a playlist entry can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetaKey {
    Title,
    Artist,
    Album,
    Comment,
    Genre,
    Composer,
    Year,
    Track,
    Disc,
}

/// A playlist entry produced by a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    path: PathBuf,
    length: Duration,
    metadata: HashMap<MetaKey, String>,
}

impl FileInfo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            length: Duration::ZERO,
            metadata: HashMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Track length. Hosts display it with whole-second resolution.
    pub fn length(&self) -> Duration {
        self.length
    }

    pub fn set_length(&mut self, length: Duration) {
        self.length = length;
    }

    /// Set a metadata field. Empty values are ignored.
    pub fn set_metadata(&mut self, key: MetaKey, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.metadata.insert(key, value);
        }
    }

    pub fn metadata(&self, key: MetaKey) -> Option<&str> {
        self.metadata.get(&key).map(String::as_str)
    }

    pub fn metadata_map(&self) -> &HashMap<MetaKey, String> {
        &self.metadata
    }
}

/// Label/value pairs shown in the host's file information dialog.
pub trait MetaDataModel: Send {
    /// Technical properties of the stream (length, format, channels...).
    fn audio_properties(&self) -> HashMap<String, String>;

    /// Descriptive fields (title, artist, comments...).
    fn descriptions(&self) -> HashMap<String, String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_info_ignores_empty_values() {
        let mut info = FileInfo::new("/music/song.xm");
        info.set_metadata(MetaKey::Title, "");
        assert_eq!(info.metadata(MetaKey::Title), None);

        info.set_metadata(MetaKey::Title, "Space Debris");
        assert_eq!(info.metadata(MetaKey::Title), Some("Space Debris"));
        assert_eq!(info.metadata_map().len(), 1);
    }

    #[test]
    fn test_file_info_length_defaults_to_zero() {
        let mut info = FileInfo::new("/music/song.xm");
        assert_eq!(info.length(), Duration::ZERO);

        info.set_length(Duration::from_secs(183));
        assert_eq!(info.length().as_secs(), 183);
        assert_eq!(info.path(), Path::new("/music/song.xm"));
    }
}
