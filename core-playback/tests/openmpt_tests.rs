//! The decoder on top of the real libopenmpt engine.
//!
//! Needs the system libopenmpt: `cargo test -p core-playback --features openmpt`.

#![cfg(feature = "openmpt")]

use bridge_traits::Decoder;
use core_engine::testing::protracker_module;
use core_engine::{FormatDetector, ModuleEngine, OpenMptEngine, RenderSettings};
use core_playback::MptDecoder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

fn write(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}

fn read_to_end(decoder: &mut MptDecoder) -> usize {
    let mut buf = vec![0u8; 16_384];
    let mut total = 0;
    for _ in 0..100_000 {
        let n = decoder.read(&mut buf);
        if n == 0 {
            return total;
        }
        total += n;
    }
    panic!("decoder never reached end of stream");
}

#[test]
fn test_rejected_files_fail_initialize() {
    let dir = tempfile::tempdir().unwrap();
    let engine: Arc<dyn ModuleEngine> = Arc::new(OpenMptEngine::new());
    let files = [
        write(dir.path(), "notes.txt", b"Greetings to everyone at the party!\n"),
        write(dir.path(), "fake.mod", b"M.K. but not a module"),
        write(dir.path(), "empty.xm", b""),
    ];

    for path in files {
        assert!(!engine.can_play(&path), "{}", path.display());
        let mut decoder = MptDecoder::new(&path, Arc::clone(&engine), RenderSettings::default());
        assert!(decoder.initialize().is_err(), "{}", path.display());
    }
}

#[test]
fn test_module_plays_to_the_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "square.mod", &protracker_module("square test"));
    let engine: Arc<dyn ModuleEngine> = Arc::new(OpenMptEngine::new());
    assert!(FormatDetector::has_supported_name(&path));
    assert!(engine.can_play(&path));

    let mut decoder = MptDecoder::new(&path, engine, RenderSettings::default());
    let params = decoder.initialize().unwrap();
    let total_time = decoder.total_time();
    assert!(total_time > Duration::from_secs(7) && total_time < Duration::from_secs(9));

    let bytes = read_to_end(&mut decoder);
    let rendered = Duration::from_secs_f64(
        (bytes / params.frame_size()) as f64 / f64::from(params.sample_rate),
    );
    let diff = rendered.abs_diff(total_time);
    assert!(diff < Duration::from_millis(200), "rendered {:?}", rendered);
}

#[test]
fn test_seek_past_end_clamps() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "square.mod", &protracker_module("square test"));
    let mut decoder =
        MptDecoder::new(&path, Arc::new(OpenMptEngine::new()), RenderSettings::default());
    decoder.initialize().unwrap();
    let total_time = decoder.total_time();

    decoder.seek(Duration::from_secs(3600));
    assert_eq!(decoder.total_time(), total_time);
    assert!(read_to_end(&mut decoder) < 44_100 * 4);

    decoder.seek(Duration::ZERO);
    assert!(read_to_end(&mut decoder) > 0);
}

#[test]
fn test_repeat_count_lengthens_stream() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "square.mod", &protracker_module("square test"));
    let engine: Arc<dyn ModuleEngine> = Arc::new(OpenMptEngine::new());

    let mut once = MptDecoder::new(&path, Arc::clone(&engine), RenderSettings::default());
    once.initialize().unwrap();

    let settings = RenderSettings {
        repeat_count: 1,
        ..RenderSettings::default()
    };
    let mut twice = MptDecoder::new(&path, engine, settings);
    let params = twice.initialize().unwrap();
    // Both totals are truncated to whole milliseconds.
    let doubled = once.total_time() * 2;
    assert!(twice.total_time().abs_diff(doubled) <= Duration::from_millis(2));

    let bytes = read_to_end(&mut twice);
    let rendered = Duration::from_secs_f64(
        (bytes / params.frame_size()) as f64 / f64::from(params.sample_rate),
    );
    assert!(rendered.abs_diff(twice.total_time()) < Duration::from_millis(300));
}
