//! # Host Bridge Traits
//!
//! The contract between a media-player host and a decoder plugin.
//!
//! ## Overview
//!
//! The host owns the playback pipeline, the playlist and the settings
//! storage. A plugin ships a [`DecoderFactory`](decoder::DecoderFactory) that
//! the host consults to route files, then asks it for per-file objects:
//!
//! - [`Decoder`](decoder::Decoder) - open, read PCM, seek, report duration and bitrate
//! - [`MetaDataModel`](metadata::MetaDataModel) - label/value pairs for the file info dialog
//! - [`FileInfo`](metadata::FileInfo) - playlist entries
//!
//! ## Host-provided capabilities
//!
//! - [`SettingsStore`](storage::SettingsStore) - key-value preferences storage
//! - [`LoggerSink`](logging::LoggerSink) - forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. A plugin
//! reports "this file is not mine or is corrupt" as
//! [`BridgeError::Unsupported`]; the host then moves on to the next file.
//!
//! ## Threading
//!
//! The host drives a decoder from its own decode thread, one call at a time.
//! Decoders therefore only need `Send`; factories and host capabilities are
//! shared and require `Send + Sync`.

pub mod decoder;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod storage;

pub use error::BridgeError;

pub use decoder::{
    AboutInfo, AudioParameters, Decoder, DecoderFactory, DecoderProperties, SampleFormat,
    SettingDescriptor, SettingKind,
};
pub use logging::{LogEntry, LogLevel, LoggerSink};
pub use metadata::{FileInfo, MetaDataModel, MetaKey};
pub use storage::{SettingsStore, SettingsTransaction};
