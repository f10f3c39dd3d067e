//! Host-facing file information model.

use std::collections::HashMap;
use std::path::Path;

use bridge_traits::MetaDataModel;
use core_engine::{ModuleEngine, RenderSettings};
use tracing::debug;

use crate::extractor::{ExtractedModuleInfo, ModuleInfoExtractor};

/// File information for one module, read once at construction.
///
/// A file the engine cannot open yields a model with both tables empty.
#[derive(Debug, Clone, Default)]
pub struct MptMetaDataModel {
    info: ExtractedModuleInfo,
}

impl MptMetaDataModel {
    pub fn new(path: &Path, engine: &dyn ModuleEngine) -> Self {
        Self::with_render_settings(path, engine, RenderSettings::default())
    }

    /// Like [`new`](Self::new), reporting the configured output rate.
    pub fn with_render_settings(
        path: &Path,
        engine: &dyn ModuleEngine,
        settings: RenderSettings,
    ) -> Self {
        let info = match ModuleInfoExtractor::new(engine, settings).extract_from_file(path) {
            Ok(info) => info,
            Err(e) => {
                debug!(
                    path = %path.display(),
                    unsupported = e.is_unsupported(),
                    error = %e,
                    "No module information available"
                );
                ExtractedModuleInfo::default()
            }
        };
        Self { info }
    }

    pub fn is_empty(&self) -> bool {
        self.info.audio_properties.is_empty() && self.info.descriptions.is_empty()
    }
}

impl MetaDataModel for MptMetaDataModel {
    fn audio_properties(&self) -> HashMap<String, String> {
        self.info.audio_properties.clone()
    }

    fn descriptions(&self) -> HashMap<String, String> {
        self.info.descriptions.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::labels;
    use core_engine::testing::{MockEngine, MockModuleSpec};
    use core_engine::ModuleInfo;
    use std::time::Duration;

    #[test]
    fn test_invalid_file_gives_empty_tables() {
        let engine = MockEngine::new();
        let model = MptMetaDataModel::new(Path::new("/music/broken.it"), &engine);

        assert!(model.is_empty());
        assert!(model.audio_properties().is_empty());
        assert!(model.descriptions().is_empty());
    }

    #[test]
    fn test_model_reports_render_rate() {
        let engine = MockEngine::new().with_module(
            "/music/a.s3m",
            MockModuleSpec::new(Duration::from_secs(61)).with_info(ModuleInfo {
                format_id: "s3m".into(),
                channels: 16,
                ..ModuleInfo::default()
            }),
        );
        let settings = RenderSettings {
            sample_rate: 48_000,
            ..RenderSettings::default()
        };
        let model =
            MptMetaDataModel::with_render_settings(Path::new("/music/a.s3m"), &engine, settings);

        let props = model.audio_properties();
        assert_eq!(props[labels::SAMPLE_RATE], "48000 Hz");
        assert_eq!(props[labels::LENGTH], "1:01");
        assert_eq!(props[labels::CHANNELS], "16");
        assert_eq!(props[labels::FORMAT], "S3M");
    }
}
