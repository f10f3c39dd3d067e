//! Model behind the host's settings dialog.
//!
//! The host renders the fields from [`descriptors`], edits a
//! [`SettingsForm`], and either accepts (persist) or rejects (discard) it.
//! Accepted values apply to factories created afterwards; a running
//! [`MptDecoderFactory`](crate::MptDecoderFactory) keeps the snapshot it was
//! built with.

use std::sync::Arc;

use bridge_traits::decoder::{SettingDescriptor, SettingKind};
use bridge_traits::storage::SettingsStore;
use core_engine::traits::{
    MAX_REPEAT_COUNT, MAX_SAMPLE_RATE, MAX_STEREO_SEPARATION, MIN_SAMPLE_RATE,
};
use core_engine::InterpolationFilter;
use tracing::info;

use crate::error::Result;
use crate::settings::{keys, PluginSettings};

/// Fields of the settings dialog, in display order.
pub fn descriptors() -> Vec<SettingDescriptor> {
    let defaults = PluginSettings::default();

    vec![
        SettingDescriptor {
            key: keys::USE_FILENAME.to_string(),
            label: "Use file name as song title".to_string(),
            kind: SettingKind::Toggle {
                default: defaults.use_filename,
            },
        },
        SettingDescriptor {
            key: keys::SAMPLE_RATE.to_string(),
            label: "Sample rate (Hz)".to_string(),
            kind: SettingKind::Range {
                min: i64::from(MIN_SAMPLE_RATE),
                max: i64::from(MAX_SAMPLE_RATE),
                default: i64::from(defaults.render.sample_rate),
            },
        },
        SettingDescriptor {
            key: keys::INTERPOLATION.to_string(),
            label: "Interpolation".to_string(),
            kind: SettingKind::Choice {
                options: InterpolationFilter::ALL
                    .iter()
                    .map(|filter| (i64::from(filter.taps()), filter.label().to_string()))
                    .collect(),
                default: i64::from(defaults.render.interpolation.taps()),
            },
        },
        SettingDescriptor {
            key: keys::STEREO_SEPARATION.to_string(),
            label: "Stereo separation (%)".to_string(),
            kind: SettingKind::Range {
                min: 0,
                max: i64::from(MAX_STEREO_SEPARATION),
                default: i64::from(defaults.render.stereo_separation),
            },
        },
        SettingDescriptor {
            key: keys::REPEAT_COUNT.to_string(),
            label: "Repeat count".to_string(),
            kind: SettingKind::Range {
                min: 0,
                max: i64::from(MAX_REPEAT_COUNT),
                default: i64::from(defaults.render.repeat_count),
            },
        },
    ]
}

/// Settings being edited in the dialog.
pub struct SettingsForm {
    store: Arc<dyn SettingsStore>,
    saved: PluginSettings,
    draft: PluginSettings,
}

impl SettingsForm {
    /// Open the dialog with the values currently stored.
    pub async fn load(store: Arc<dyn SettingsStore>) -> Result<Self> {
        let saved = PluginSettings::load(store.as_ref()).await?;
        Ok(Self {
            store,
            saved,
            draft: saved,
        })
    }

    /// Values as currently edited.
    pub fn values(&self) -> &PluginSettings {
        &self.draft
    }

    pub fn is_modified(&self) -> bool {
        self.draft != self.saved
    }

    pub fn set_use_filename(&mut self, use_filename: bool) {
        self.draft.use_filename = use_filename;
    }

    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.draft.render.sample_rate = sample_rate;
    }

    pub fn set_interpolation(&mut self, interpolation: InterpolationFilter) {
        self.draft.render.interpolation = interpolation;
    }

    pub fn set_stereo_separation(&mut self, percent: u32) {
        self.draft.render.stereo_separation = percent;
    }

    pub fn set_repeat_count(&mut self, count: u32) {
        self.draft.render.repeat_count = count;
    }

    /// Persist the edited values and close the dialog.
    ///
    /// Returns the values as stored (clamped into their valid ranges).
    pub async fn accept(self) -> Result<PluginSettings> {
        let accepted = PluginSettings {
            use_filename: self.draft.use_filename,
            render: self.draft.render.clamped(),
        };
        accepted.save(self.store.as_ref()).await?;

        info!(modified = accepted != self.saved, "Settings accepted");
        Ok(accepted)
    }

    /// Close the dialog without saving. Returns the unchanged stored values.
    pub fn reject(self) -> PluginSettings {
        self.saved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptors_cover_every_key() {
        let fields = descriptors();
        let names: Vec<&str> = fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(
            names,
            vec![
                keys::USE_FILENAME,
                keys::SAMPLE_RATE,
                keys::INTERPOLATION,
                keys::STEREO_SEPARATION,
                keys::REPEAT_COUNT,
            ]
        );
    }

    #[test]
    fn test_use_filename_defaults_off() {
        let fields = descriptors();
        assert_eq!(fields[0].kind, SettingKind::Toggle { default: false });
    }

    #[test]
    fn test_interpolation_choices() {
        let fields = descriptors();
        let SettingKind::Choice { options, default } = &fields[2].kind else {
            panic!("interpolation must be a choice");
        };
        assert_eq!(*default, 0);
        assert_eq!(options.len(), InterpolationFilter::ALL.len());
        assert!(options.iter().any(|(taps, _)| *taps == 8));
    }
}
