//! # Plugin Configuration
//!
//! Collects what the plugin needs from its host before it can build a
//! [`MptDecoderFactory`](crate::MptDecoderFactory):
//!
//! - a [`ModuleEngine`]
//! - a [`SettingsStore`]
//! - optionally, a [`LoggingConfig`] to install a `tracing` subscriber
//!
//! Missing capabilities fall back to platform defaults when the matching
//! cargo feature is enabled: the libopenmpt engine with `openmpt`, the
//! JSON-file settings store with `desktop-shims`.
//!
//! ```ignore
//! use core_service::{bootstrap, PluginConfig};
//!
//! let config = PluginConfig::builder()
//!     .settings_store(host_store)
//!     .engine(engine)
//!     .build()?;
//! let factory = bootstrap(config).await?;
//! ```

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use bridge_traits::storage::SettingsStore;
use core_engine::ModuleEngine;
use core_runtime::logging::LoggingConfig;

use crate::error::{CoreError, Result};

/// Where the settings come from.
#[derive(Clone)]
pub enum SettingsSource {
    /// A store provided by the host.
    Store(Arc<dyn SettingsStore>),
    /// A JSON file at this path (`desktop-shims`).
    File(PathBuf),
    /// The JSON file in the user configuration directory (`desktop-shims`).
    Default,
}

/// Everything [`bootstrap`](crate::bootstrap) needs.
pub struct PluginConfig {
    pub engine: Arc<dyn ModuleEngine>,
    pub settings: SettingsSource,
    pub logging: Option<LoggingConfig>,
}

impl fmt::Debug for PluginConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settings = match &self.settings {
            SettingsSource::Store(_) => "host store".to_string(),
            SettingsSource::File(path) => path.display().to_string(),
            SettingsSource::Default => "default".to_string(),
        };
        f.debug_struct("PluginConfig")
            .field("engine", &self.engine.name())
            .field("settings", &settings)
            .field("logging", &self.logging.is_some())
            .finish()
    }
}

impl PluginConfig {
    pub fn builder() -> PluginConfigBuilder {
        PluginConfigBuilder::default()
    }
}

/// Builder for [`PluginConfig`].
#[derive(Default)]
pub struct PluginConfigBuilder {
    engine: Option<Arc<dyn ModuleEngine>>,
    settings: Option<SettingsSource>,
    logging: Option<LoggingConfig>,
}

impl PluginConfigBuilder {
    /// Use `engine` instead of the default libopenmpt engine.
    pub fn engine(mut self, engine: Arc<dyn ModuleEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Read and write settings through the host's store.
    pub fn settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings = Some(SettingsSource::Store(store));
        self
    }

    /// Keep settings in a JSON file at `path`.
    pub fn settings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings = Some(SettingsSource::File(path.into()));
        self
    }

    /// Install a `tracing` subscriber during bootstrap.
    pub fn logging(mut self, config: LoggingConfig) -> Self {
        self.logging = Some(config);
        self
    }

    /// Builds the final `PluginConfig`.
    ///
    /// # Errors
    ///
    /// [`CoreError::CapabilityMissing`] if a capability was not provided and
    /// no default is compiled in.
    pub fn build(self) -> Result<PluginConfig> {
        let engine = match self.engine {
            Some(engine) => engine,
            None => provide_default_engine()?,
        };

        let settings = match self.settings {
            Some(SettingsSource::Store(store)) => SettingsSource::Store(store),
            Some(file_or_default) => require_desktop_store(file_or_default)?,
            None => require_desktop_store(SettingsSource::Default)?,
        };

        Ok(PluginConfig {
            engine,
            settings,
            logging: self.logging,
        })
    }
}

#[cfg(feature = "openmpt")]
fn provide_default_engine() -> Result<Arc<dyn ModuleEngine>> {
    use core_engine::OpenMptEngine;

    let engine: Arc<dyn ModuleEngine> = Arc::new(OpenMptEngine::new());
    Ok(engine)
}

#[cfg(not(feature = "openmpt"))]
fn provide_default_engine() -> Result<Arc<dyn ModuleEngine>> {
    Err(CoreError::CapabilityMissing {
        capability: "ModuleEngine".to_string(),
        message: "A module engine is required to decode tracker files. \
                 Enable the 'openmpt' feature to link the system libopenmpt, \
                 or inject an engine with PluginConfigBuilder::engine."
            .to_string(),
    })
}

#[cfg(not(feature = "desktop-shims"))]
fn settings_store_missing_error() -> CoreError {
    CoreError::CapabilityMissing {
        capability: "SettingsStore".to_string(),
        message: "SettingsStore implementation is required for plugin preferences. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default JsonSettingsStore. \
                 Embedded hosts: inject their own store with PluginConfigBuilder::settings_store."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn require_desktop_store(source: SettingsSource) -> Result<SettingsSource> {
    Ok(source)
}

#[cfg(not(feature = "desktop-shims"))]
fn require_desktop_store(_source: SettingsSource) -> Result<SettingsSource> {
    Err(settings_store_missing_error())
}

/// Resolve a [`SettingsSource`] to a store.
#[cfg(feature = "desktop-shims")]
pub(crate) async fn open_settings_store(
    source: &SettingsSource,
) -> Result<Arc<dyn SettingsStore>> {
    use bridge_desktop::JsonSettingsStore;

    let path = match source {
        SettingsSource::Store(store) => return Ok(Arc::clone(store)),
        SettingsSource::File(path) => path.clone(),
        SettingsSource::Default => JsonSettingsStore::default_path()?,
    };

    let store = JsonSettingsStore::open(path).await.map_err(|e| {
        CoreError::InitializationFailed(format!("Failed to open settings file: {}", e))
    })?;
    let store: Arc<dyn SettingsStore> = Arc::new(store);
    Ok(store)
}

#[cfg(not(feature = "desktop-shims"))]
pub(crate) async fn open_settings_store(
    source: &SettingsSource,
) -> Result<Arc<dyn SettingsStore>> {
    match source {
        SettingsSource::Store(store) => Ok(Arc::clone(store)),
        _ => Err(settings_store_missing_error()),
    }
}
