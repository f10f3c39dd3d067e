//! Playlist entries for module files.

use std::path::Path;
use std::time::Duration;

use bridge_traits::{FileInfo, MetaKey};
use core_engine::TrackerModule;

use crate::extractor::normalize_text;

/// Where a playlist entry's title comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TitleOptions {
    /// Always use the file name, ignoring the embedded title.
    pub use_filename: bool,
    /// Use the embedded title when present. Set by the host per request.
    pub use_metadata: bool,
}

/// Build the single playlist entry for an opened module.
///
/// The length is truncated to whole seconds. The title is the last path
/// component when `use_filename` is set, otherwise the embedded title when
/// `use_metadata` is set and the module has one. No other tag is filled.
pub fn build_playlist_entry(
    path: &Path,
    module: &dyn TrackerModule,
    options: TitleOptions,
) -> FileInfo {
    let mut entry = FileInfo::new(path);
    entry.set_length(Duration::from_secs(module.duration().as_secs()));

    if options.use_filename {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        entry.set_metadata(MetaKey::Title, name);
    } else if options.use_metadata {
        entry.set_metadata(MetaKey::Title, normalize_text(&module.title()));
    }

    entry
}
