use core_engine::EngineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Failed to open module: {0}")]
    Engine(#[from] EngineError),
}

impl MetadataError {
    /// Returns `true` if the engine does not consider the file a module.
    pub fn is_unsupported(&self) -> bool {
        match self {
            MetadataError::Engine(e) => e.is_invalid_file(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MetadataError>;
