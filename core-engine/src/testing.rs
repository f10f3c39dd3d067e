//! In-memory engine for tests.
//!
//! [`MockEngine`] answers for a fixed set of paths registered with
//! [`MockEngine::with_module`]. Opened modules render a deterministic
//! sawtooth for exactly their configured duration, once per pass
//! requested by the repeat count, so adapters can be exercised without
//! libopenmpt or real module files.
//!
//! [`protracker_module`] builds a small real module file for tests that run
//! against libopenmpt.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{EngineError, Result};
use crate::traits::{ModuleEngine, ModuleInfo, RenderSettings, TrackerModule};

/// What a registered path opens to.
#[derive(Debug, Clone, Default)]
pub struct MockModuleSpec {
    /// Length of one pass through the song.
    pub duration: Duration,
    pub info: ModuleInfo,
}

impl MockModuleSpec {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            info: ModuleInfo::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.info.title = title.into();
        self
    }

    pub fn with_info(mut self, info: ModuleInfo) -> Self {
        let title = std::mem::take(&mut self.info.title);
        self.info = info;
        if self.info.title.is_empty() {
            self.info.title = title;
        }
        self
    }
}

/// Scripted [`ModuleEngine`].
#[derive(Debug, Default)]
pub struct MockEngine {
    modules: HashMap<PathBuf, MockModuleSpec>,
    opened: AtomicUsize,
    last_settings: Mutex<Option<RenderSettings>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, path: impl Into<PathBuf>, spec: MockModuleSpec) -> Self {
        self.modules.insert(path.into(), spec);
        self
    }

    /// Number of successful `open` calls so far.
    pub fn open_count(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Settings passed to the most recent successful `open`.
    pub fn last_settings(&self) -> Option<RenderSettings> {
        *self
            .last_settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ModuleEngine for MockEngine {
    fn name(&self) -> &str {
        "mock"
    }

    fn can_play(&self, path: &Path) -> bool {
        self.modules.contains_key(path)
    }

    fn open(&self, path: &Path, settings: &RenderSettings) -> Result<Box<dyn TrackerModule>> {
        let spec = self
            .modules
            .get(path)
            .cloned()
            .ok_or_else(|| EngineError::invalid_file(path, "unrecognized module format"))?;

        self.opened.fetch_add(1, Ordering::SeqCst);
        *self
            .last_settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(*settings);

        Ok(Box::new(MockModule {
            spec,
            passes: settings.repeat_count + 1,
            frames_played: 0,
            rate: settings.sample_rate.max(1),
        }))
    }
}

/// Module produced by [`MockEngine`].
///
/// Position is tracked in frames at the rate of the last `read`, so chunked
/// reads add up to exactly the configured duration.
#[derive(Debug)]
pub struct MockModule {
    spec: MockModuleSpec,
    passes: u32,
    frames_played: u64,
    rate: u32,
}

impl MockModule {
    fn frames_at(duration: Duration, rate: u32) -> u64 {
        (duration.as_nanos() * rate as u128 / 1_000_000_000) as u64
    }
}

impl TrackerModule for MockModule {
    fn duration(&self) -> Duration {
        self.spec.duration * self.passes
    }

    fn title(&self) -> String {
        self.spec.info.title.clone()
    }

    fn info(&self) -> ModuleInfo {
        self.spec.info.clone()
    }

    fn read(&mut self, sample_rate: u32, buf: &mut [i16]) -> usize {
        if sample_rate == 0 {
            return 0;
        }
        if sample_rate != self.rate {
            let position = self.position();
            self.rate = sample_rate;
            self.frames_played = Self::frames_at(position, sample_rate);
        }

        let total = Self::frames_at(self.duration(), sample_rate);
        let remaining = total.saturating_sub(self.frames_played);
        let frames = (buf.len() as u64 / 2).min(remaining) as usize;

        for (i, frame) in buf.chunks_exact_mut(2).take(frames).enumerate() {
            let value = ((self.frames_played + i as u64) % 256) as i16 * 64 - 8192;
            frame[0] = value;
            frame[1] = -value;
        }

        self.frames_played += frames as u64;
        frames
    }

    fn seek(&mut self, position: Duration) -> Duration {
        let target = position.min(self.duration());
        self.frames_played = Self::frames_at(target, self.rate);
        self.position()
    }

    fn position(&self) -> Duration {
        Duration::from_nanos(self.frames_played * 1_000_000_000 / self.rate as u64)
    }
}

/// Length in bytes of the looping sample in [`protracker_module`].
const FIXTURE_SAMPLE_BYTES: usize = 64;

/// Build a 4-channel ProTracker (`M.K.`) module.
///
/// One pattern of 64 rows at the default speed (6 ticks, 125 BPM), so one
/// pass lasts 7.68 seconds. Sample 1 is a looping square wave named
/// `square`; channel 1 plays it at C-2 on the first row. The title is
/// truncated to 20 bytes.
pub fn protracker_module(title: &str) -> Vec<u8> {
    let mut data = Vec::with_capacity(1084 + 1024 + FIXTURE_SAMPLE_BYTES);

    let mut name = [0u8; 20];
    let title = title.as_bytes();
    let len = title.len().min(name.len());
    name[..len].copy_from_slice(&title[..len]);
    data.extend_from_slice(&name);

    let words = (FIXTURE_SAMPLE_BYTES / 2) as u16;
    for index in 0..31 {
        let mut header = [0u8; 30];
        if index == 0 {
            header[..6].copy_from_slice(b"square");
            header[22..24].copy_from_slice(&words.to_be_bytes());
            header[25] = 64;
            header[28..30].copy_from_slice(&words.to_be_bytes());
        }
        data.extend_from_slice(&header);
    }

    data.push(1); // song length in orders
    data.push(127);
    data.extend_from_slice(&[0u8; 128]);
    data.extend_from_slice(b"M.K.");

    let mut pattern = [0u8; 64 * 4 * 4];
    let period: u16 = 428;
    pattern[0] = (period >> 8) as u8;
    pattern[1] = (period & 0xff) as u8;
    pattern[2] = 0x10;
    data.extend_from_slice(&pattern);

    let half = FIXTURE_SAMPLE_BYTES / 2;
    data.extend(std::iter::repeat(100i8 as u8).take(half));
    data.extend(std::iter::repeat(-100i8 as u8).take(half));

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_path_is_invalid() {
        let engine = MockEngine::new();
        let err = engine
            .open(Path::new("/nope.mod"), &RenderSettings::default())
            .err()
            .unwrap();
        assert!(err.is_invalid_file());
        assert!(!engine.can_play(Path::new("/nope.mod")));
    }

    #[test]
    fn test_module_renders_exact_duration() {
        let engine =
            MockEngine::new().with_module("/a.xm", MockModuleSpec::new(Duration::from_millis(10)));
        let mut module = engine.open(Path::new("/a.xm"), &RenderSettings::default()).unwrap();

        let mut buf = vec![0i16; 2 * 1024];
        let mut total = 0;
        loop {
            let frames = module.read(44_100, &mut buf);
            if frames == 0 {
                break;
            }
            total += frames;
        }
        assert_eq!(total, 441);
        assert_eq!(engine.open_count(), 1);
    }

    #[test]
    fn test_seek_clamps_to_duration() {
        let engine =
            MockEngine::new().with_module("/a.xm", MockModuleSpec::new(Duration::from_secs(5)));
        let mut module = engine.open(Path::new("/a.xm"), &RenderSettings::default()).unwrap();

        assert_eq!(module.seek(Duration::from_secs(60)), Duration::from_secs(5));
        assert_eq!(module.read(44_100, &mut [0i16; 64]), 0);
    }

    #[test]
    fn test_repeats_extend_the_stream() {
        let engine =
            MockEngine::new().with_module("/a.xm", MockModuleSpec::new(Duration::from_millis(10)));
        let settings = RenderSettings {
            repeat_count: 2,
            ..RenderSettings::default()
        };
        let mut module = engine.open(Path::new("/a.xm"), &settings).unwrap();
        assert_eq!(module.duration(), Duration::from_millis(30));

        let mut buf = vec![0i16; 2 * 4096];
        let mut total = 0;
        loop {
            let frames = module.read(44_100, &mut buf);
            if frames == 0 {
                break;
            }
            total += frames;
        }
        assert_eq!(total, 3 * 441);
        assert_eq!(module.position(), Duration::from_millis(30));
    }

    #[test]
    fn test_protracker_module_layout() {
        let data = protracker_module("fixture");
        assert_eq!(&data[..7], b"fixture");
        assert_eq!(&data[1080..1084], b"M.K.");
        assert_eq!(data.len(), 1084 + 1024 + 64);
    }
}
