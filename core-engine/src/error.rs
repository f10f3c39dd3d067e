//! # Engine Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised at the engine seam.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine does not recognize the file, or the file is corrupt.
    #[error("Not a playable module: {}: {}", .path.display(), .reason)]
    InvalidFile { path: PathBuf, reason: String },

    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn invalid_file(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        EngineError::InvalidFile {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if the error means "this file is not a module".
    pub fn is_invalid_file(&self) -> bool {
        matches!(self, EngineError::InvalidFile { .. })
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
