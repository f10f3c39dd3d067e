//! # Playback Error Types

use bridge_traits::error::BridgeError;
use core_engine::EngineError;
use thiserror::Error;

/// Errors that can occur while preparing a module for playback.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// The engine does not recognize the file or cannot open it.
    #[error("Unsupported module: {0}")]
    Unsupported(#[from] EngineError),
}

impl From<PlaybackError> for BridgeError {
    fn from(err: PlaybackError) -> Self {
        BridgeError::Unsupported(err.to_string())
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
