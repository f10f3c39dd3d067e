//! Plugin façade and bootstrap helpers.
//!
//! This crate wires a module engine and the host's settings storage into a
//! [`MptDecoderFactory`], the object a host registers as its decoder plugin.
//! Desktop hosts typically enable the `desktop-shims` feature (JSON settings
//! file in the user configuration directory) and the `openmpt` feature
//! (system libopenmpt); embedded hosts inject their own implementations
//! through [`PluginConfigBuilder`].

pub mod config;
pub mod error;
pub mod factory;
pub mod form;
pub mod settings;

pub use config::{PluginConfig, PluginConfigBuilder, SettingsSource};
pub use error::{CoreError, Result};
pub use factory::MptDecoderFactory;
pub use form::SettingsForm;
pub use settings::{PluginSettings, SHORT_NAME};

pub use bridge_traits::{
    AboutInfo, AudioParameters, Decoder, DecoderFactory, DecoderProperties, FileInfo,
    MetaDataModel, MetaKey, SampleFormat, SettingsStore,
};
pub use core_engine::{InterpolationFilter, ModuleEngine, RenderSettings};
pub use core_runtime::logging::{LogFormat, LoggingConfig};

#[cfg(feature = "openmpt")]
pub use core_engine::OpenMptEngine;

use tracing::info;

/// Build a ready-to-register decoder factory.
///
/// Installs logging if configured, opens the settings store and takes a
/// snapshot of the current settings.
///
/// ```
/// # async fn example(engine: std::sync::Arc<dyn core_service::ModuleEngine>,
/// #     store: std::sync::Arc<dyn core_service::SettingsStore>) -> core_service::Result<()> {
/// use core_service::{bootstrap, DecoderFactory, PluginConfig};
///
/// let config = PluginConfig::builder()
///     .engine(engine)
///     .settings_store(store)
///     .build()?;
/// let factory = bootstrap(config).await?;
/// assert_eq!(factory.properties().short_name, "cas-openmpt");
/// # Ok(())
/// # }
/// ```
pub async fn bootstrap(config: PluginConfig) -> Result<MptDecoderFactory> {
    if let Some(logging) = config.logging {
        core_runtime::logging::init_logging(logging)?;
    }

    let store = config::open_settings_store(&config.settings).await?;
    let settings = PluginSettings::load(store.as_ref()).await?;

    info!(
        engine = config.engine.name(),
        use_filename = settings.use_filename,
        sample_rate = settings.render.sample_rate,
        "OpenMPT plugin ready"
    );
    Ok(MptDecoderFactory::new(config.engine, settings))
}
