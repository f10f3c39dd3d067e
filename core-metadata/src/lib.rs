//! # Module Metadata
//!
//! File information and playlist entries for tracker modules.
//!
//! ## Overview
//!
//! - [`MptMetaDataModel`]: the host's file information dialog (audio
//!   properties and descriptive fields)
//! - [`build_playlist_entry`]: the single playlist entry a module file
//!   expands to
//! - [`extractor`]: the table building both of them share

pub mod error;
pub mod extractor;
pub mod model;
pub mod playlist;

pub use error::{MetadataError, Result};
pub use extractor::{format_length, labels, ExtractedModuleInfo, ModuleInfoExtractor};
pub use model::MptMetaDataModel;
pub use playlist::{build_playlist_entry, TitleOptions};
