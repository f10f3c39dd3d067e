//! # Decoder Factory
//!
//! Entry point the host talks to. Answers "can you play this file?",
//! describes the plugin, and hands out decoders, playlist entries and
//! metadata models bound to the shared engine.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bridge_traits::decoder::{
    AboutInfo, Decoder, DecoderFactory, DecoderProperties, SettingDescriptor,
};
use bridge_traits::metadata::{FileInfo, MetaDataModel};
use bridge_traits::storage::SettingsStore;
use core_engine::{FormatDetector, ModuleEngine};
use core_metadata::{build_playlist_entry, MptMetaDataModel, TitleOptions};
use core_playback::MptDecoder;
use tracing::debug;

use crate::error::Result;
use crate::form::{self, SettingsForm};
use crate::settings::{PluginSettings, SHORT_NAME};

pub const PLUGIN_NAME: &str = "OpenMPT Plugin";
pub const PLUGIN_DESCRIPTION: &str = "OpenMPT Module Files";
pub const ABOUT_TITLE: &str = "About OpenMPT Audio Plugin";
pub const ABOUT_TEXT: &str = "OpenMPT Audio Plugin\nWritten by: Chris Spiegel <cspiegel@gmail.com>";

/// Decoder factory for tracker modules.
///
/// Holds the settings snapshot it was created with. Settings saved later
/// through a [`SettingsForm`] only affect factories created afterwards.
pub struct MptDecoderFactory {
    engine: Arc<dyn ModuleEngine>,
    settings: PluginSettings,
}

impl MptDecoderFactory {
    pub fn new(engine: Arc<dyn ModuleEngine>, settings: PluginSettings) -> Self {
        debug!(engine = engine.name(), ?settings, "Created decoder factory");
        Self { engine, settings }
    }

    /// Settings snapshot in use.
    pub fn plugin_settings(&self) -> &PluginSettings {
        &self.settings
    }

    pub fn engine(&self) -> &Arc<dyn ModuleEngine> {
        &self.engine
    }

    /// Open the settings dialog model over `store`.
    pub async fn settings_form(&self, store: Arc<dyn SettingsStore>) -> Result<SettingsForm> {
        SettingsForm::load(store).await
    }
}

impl DecoderFactory for MptDecoderFactory {
    fn supports(&self, path: &Path) -> bool {
        let supported = self.engine.can_play(path);
        debug!(path = %path.display(), supported, "Format check");
        supported
    }

    fn can_decode(&self, _input: &mut dyn Read) -> bool {
        false
    }

    fn properties(&self) -> DecoderProperties {
        DecoderProperties {
            name: PLUGIN_NAME.to_string(),
            short_name: SHORT_NAME.to_string(),
            filters: FormatDetector::filters(),
            description: PLUGIN_DESCRIPTION.to_string(),
            protocols: vec!["file".to_string()],
            has_about: true,
            has_settings: true,
            no_input: true,
        }
    }

    fn create(&self, path: &Path) -> Box<dyn Decoder> {
        Box::new(MptDecoder::new(
            path,
            Arc::clone(&self.engine),
            self.settings.render,
        ))
    }

    fn create_playlist(
        &self,
        path: &Path,
        use_metadata: bool,
        _ignored_paths: &mut Vec<PathBuf>,
    ) -> Vec<FileInfo> {
        match self.engine.open(path, &self.settings.render) {
            Ok(module) => {
                let options = TitleOptions {
                    use_filename: self.settings.use_filename,
                    use_metadata,
                };
                vec![build_playlist_entry(path, module.as_ref(), options)]
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "No playlist entry");
                Vec::new()
            }
        }
    }

    fn create_metadata_model(&self, path: &Path) -> Box<dyn MetaDataModel> {
        Box::new(MptMetaDataModel::with_render_settings(
            path,
            self.engine.as_ref(),
            self.settings.render,
        ))
    }

    fn about(&self) -> AboutInfo {
        AboutInfo {
            title: ABOUT_TITLE.to_string(),
            text: ABOUT_TEXT.to_string(),
        }
    }

    fn settings(&self) -> Vec<SettingDescriptor> {
        form::descriptors()
    }
}
