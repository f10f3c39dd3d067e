//! # Plugin Settings
//!
//! Values the user can change in the settings dialog, persisted in the host
//! [`SettingsStore`] under keys prefixed with the plugin short name.
//!
//! | Key                             | Type | Default |
//! |---------------------------------|------|---------|
//! | `cas-openmpt/use_filename`      | bool | `false` |
//! | `cas-openmpt/sample_rate`       | i64  | 44100   |
//! | `cas-openmpt/interpolation`     | i64  | 0 (engine default) |
//! | `cas-openmpt/stereo_separation` | i64  | 100     |
//! | `cas-openmpt/repeat_count`      | i64  | 0       |
//!
//! Missing keys fall back to their defaults. Out-of-range numbers are
//! clamped on load.

use bridge_traits::storage::SettingsStore;
use core_engine::{InterpolationFilter, RenderSettings};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// Short name of the plugin; prefixes every settings key.
pub const SHORT_NAME: &str = "cas-openmpt";

pub mod keys {
    pub const USE_FILENAME: &str = "cas-openmpt/use_filename";
    pub const SAMPLE_RATE: &str = "cas-openmpt/sample_rate";
    pub const INTERPOLATION: &str = "cas-openmpt/interpolation";
    pub const STEREO_SEPARATION: &str = "cas-openmpt/stereo_separation";
    pub const REPEAT_COUNT: &str = "cas-openmpt/repeat_count";
}

/// Snapshot of the plugin settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PluginSettings {
    /// Title playlist entries with the file name instead of the embedded
    /// song title.
    #[serde(default)]
    pub use_filename: bool,

    /// Mixer parameters applied to every opened module.
    #[serde(default)]
    pub render: RenderSettings,
}

impl PluginSettings {
    /// Read the settings from `store`.
    ///
    /// # Errors
    ///
    /// Fails if the store itself fails, including when a key holds a value
    /// of the wrong type.
    pub async fn load(store: &dyn SettingsStore) -> Result<Self> {
        let defaults = Self::default();

        let use_filename = store
            .get_bool(keys::USE_FILENAME)
            .await?
            .unwrap_or(defaults.use_filename);

        let sample_rate = read_u32(store, keys::SAMPLE_RATE, defaults.render.sample_rate).await?;
        let interpolation = store
            .get_i64(keys::INTERPOLATION)
            .await?
            .map(InterpolationFilter::from_taps)
            .unwrap_or(defaults.render.interpolation);
        let stereo_separation = read_u32(
            store,
            keys::STEREO_SEPARATION,
            defaults.render.stereo_separation,
        )
        .await?;
        let repeat_count = read_u32(store, keys::REPEAT_COUNT, defaults.render.repeat_count).await?;

        let settings = Self {
            use_filename,
            render: RenderSettings {
                sample_rate,
                interpolation,
                stereo_separation,
                repeat_count,
            }
            .clamped(),
        };

        debug!(?settings, "Loaded plugin settings");
        Ok(settings)
    }

    /// Write every value to `store` in one transaction.
    ///
    /// Either all keys are saved or, if the store fails, none of them.
    pub async fn save(&self, store: &dyn SettingsStore) -> Result<()> {
        let render = self.render.clamped();

        let mut tx = store.begin_transaction().await?;
        tx.set_bool(keys::USE_FILENAME, self.use_filename).await?;
        tx.set_i64(keys::SAMPLE_RATE, i64::from(render.sample_rate))
            .await?;
        tx.set_i64(keys::INTERPOLATION, i64::from(render.interpolation.taps()))
            .await?;
        tx.set_i64(keys::STEREO_SEPARATION, i64::from(render.stereo_separation))
            .await?;
        tx.set_i64(keys::REPEAT_COUNT, i64::from(render.repeat_count))
            .await?;
        tx.commit().await?;

        debug!(settings = ?self, "Saved plugin settings");
        Ok(())
    }
}

async fn read_u32(store: &dyn SettingsStore, key: &str, default: u32) -> Result<u32> {
    let Some(value) = store.get_i64(key).await? else {
        return Ok(default);
    };
    match u32::try_from(value) {
        Ok(value) => Ok(value),
        Err(_) => {
            warn!(key = key, value = value, "Setting out of range, using default");
            Ok(default)
        }
    }
}
