//! File information for fully described and sparse modules.

use bridge_traits::{MetaDataModel, MetaKey};
use core_engine::testing::{MockEngine, MockModuleSpec};
use core_engine::{ModuleEngine, ModuleInfo, RenderSettings};
use core_metadata::{build_playlist_entry, labels, MptMetaDataModel, TitleOptions};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

fn full_info() -> ModuleInfo {
    ModuleInfo {
        format_id: "it".into(),
        format_name: "Impulse Tracker".into(),
        container: "umx".into(),
        tracker: "Impulse Tracker 2.14".into(),
        title: "Beyond the Network".into(),
        artist: "Necros".into(),
        date: "1996-04-12".into(),
        message: "Made for the Unreal soundtrack".into(),
        channels: 24,
        patterns: 57,
        orders: 62,
        instruments: 2,
        samples: 2,
        subsongs: 1,
        instrument_names: vec!["Strings".into(), "Choir".into()],
        sample_names: vec!["str.wav".into(), "".into(), "ch.wav".into()],
    }
}

fn engine() -> MockEngine {
    MockEngine::new()
        .with_module(
            "/music/beyond.umx",
            MockModuleSpec::new(Duration::from_secs(180)).with_info(full_info()),
        )
        .with_module("/music/bare.mod", MockModuleSpec::new(Duration::from_secs(95)))
}

#[test]
fn test_full_module_fills_every_field() {
    let engine = engine();
    let model = MptMetaDataModel::new(Path::new("/music/beyond.umx"), &engine);

    let props = model.audio_properties();
    assert_eq!(props.len(), 10);
    assert_eq!(props[labels::LENGTH], "3:00");
    assert_eq!(props[labels::FORMAT], "Impulse Tracker (IT)");
    assert_eq!(props[labels::CONTAINER], "UMX");
    assert_eq!(props[labels::INSTRUMENTS], "2");

    let descs = model.descriptions();
    assert_eq!(descs.len(), 7);
    assert_eq!(descs[labels::ARTIST], "Necros");
    assert_eq!(descs[labels::SAMPLE_NAMES], "str.wav\nch.wav");
}

#[test]
fn test_labels_are_unique_across_tables() {
    let engine = engine();
    let model = MptMetaDataModel::new(Path::new("/music/beyond.umx"), &engine);

    let props = model.audio_properties();
    let descs = model.descriptions();
    let all: HashSet<&String> = props.keys().chain(descs.keys()).collect();
    assert_eq!(all.len(), props.len() + descs.len());
}

#[test]
fn test_sparse_module_omits_empty_fields() {
    let engine = engine();
    let model = MptMetaDataModel::new(Path::new("/music/bare.mod"), &engine);

    let props = model.audio_properties();
    assert_eq!(props[labels::LENGTH], "1:35");
    assert!(props.contains_key(labels::SAMPLE_RATE));
    assert!(!props.contains_key(labels::CONTAINER));
    assert!(!props.contains_key(labels::FORMAT));
    assert!(model.descriptions().is_empty());
}

#[test]
fn test_missing_file_gives_empty_model() {
    let engine = engine();
    let model = MptMetaDataModel::new(Path::new("/music/missing.xm"), &engine);
    assert!(model.audio_properties().is_empty());
    assert!(model.descriptions().is_empty());
    assert_eq!(engine.open_count(), 0);
}

#[test]
fn test_playlist_entry_from_engine() {
    let engine = engine();
    let path = Path::new("/music/beyond.umx");
    let module = engine.open(path, &RenderSettings::default()).unwrap();

    let entry = build_playlist_entry(
        path,
        module.as_ref(),
        TitleOptions {
            use_filename: false,
            use_metadata: true,
        },
    );
    assert_eq!(entry.length().as_secs(), 180);
    assert_eq!(entry.metadata(MetaKey::Title), Some("Beyond the Network"));
}
