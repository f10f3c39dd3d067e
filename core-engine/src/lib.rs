//! # Module Engine Seam
//!
//! The plugin does not parse or render tracker modules itself. It talks to an
//! external engine through the two traits in [`traits`]:
//!
//! - [`ModuleEngine`]: "can you play this file?" and "open this file"
//! - [`TrackerModule`]: one opened module (duration, title, info, PCM, seek)
//!
//! ## Backends
//!
//! | Backend           | Feature   | Links                |
//! |-------------------|-----------|----------------------|
//! | [`OpenMptEngine`] | `openmpt` | system `libopenmpt`  |
//!
//! Adapters above this crate only hold `Arc<dyn ModuleEngine>`, so hosts and
//! tests can substitute their own engine.
//!
//! Enabling the `testing` feature adds [`testing::MockEngine`], a scripted
//! in-memory engine for adapter tests.
//!
//! ## Formats
//!
//! [`format`] lists the file types the plugin announces to the host and
//! offers extension-based routing helpers.

pub mod error;
pub mod format;
pub mod traits;

#[cfg(feature = "openmpt")]
pub mod openmpt;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{EngineError, Result};
pub use format::{FormatDetector, ModuleFormat, SUPPORTED_FORMATS};
pub use traits::{
    InterpolationFilter, ModuleEngine, ModuleInfo, RenderSettings, TrackerModule,
    OUTPUT_CHANNELS,
};

#[cfg(feature = "openmpt")]
pub use openmpt::{OpenMptEngine, OpenMptModule};
