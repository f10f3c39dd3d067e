//! # libopenmpt Backend
//!
//! [`ModuleEngine`] implementation on top of the system `libopenmpt`.
//! Enabled with the `openmpt` feature.
//!
//! Files are loaded into memory and handed to
//! `openmpt_module_create_from_memory2`. The engine's own log output is
//! silenced; failures surface as [`EngineError::InvalidFile`] carrying the
//! library's error message.
//!
//! libopenmpt reports the length of one pass through the song. With a
//! repeat count the stream is longer, so [`OpenMptModule`] scales the
//! duration, counts the stream position itself and maps seeks onto the
//! right pass.

mod ffi;

use std::ffi::{CStr, CString};
use std::fs::File;
use std::io::Read;
use std::os::raw::{c_char, c_int, c_void};
use std::path::Path;
use std::ptr::{self, NonNull};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::traits::{ModuleEngine, ModuleInfo, RenderSettings, TrackerModule};

/// The libopenmpt engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenMptEngine;

impl OpenMptEngine {
    pub fn new() -> Self {
        Self
    }

    /// Library version as `major.minor.patch`.
    pub fn library_version() -> String {
        // SAFETY: no arguments, returns a plain integer.
        let version = unsafe { ffi::openmpt_get_library_version() };
        format!(
            "{}.{}.{}",
            (version >> 24) & 0xff,
            (version >> 16) & 0xff,
            version & 0xffff
        )
    }

    fn check_header(data: &[u8], file_size: u64) -> c_int {
        // SAFETY: `data` outlives the call and the size matches. Log and
        // error callbacks are the library's own no-op handlers.
        unsafe {
            ffi::openmpt_probe_file_header(
                ffi::OPENMPT_PROBE_FILE_HEADER_FLAGS_DEFAULT,
                data.as_ptr() as *const c_void,
                data.len(),
                file_size,
                Some(ffi::openmpt_log_func_silent),
                ptr::null_mut(),
                Some(ffi::openmpt_error_func_ignore),
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
            )
        }
    }

    fn create(path: &Path, data: &[u8]) -> Result<NonNull<ffi::openmpt_module>> {
        let mut error: c_int = 0;
        let mut message: *const c_char = ptr::null();

        // SAFETY: `data` outlives the call (libopenmpt copies it), the out
        // pointers are valid locals, and a null ctl list is allowed.
        let raw = unsafe {
            ffi::openmpt_module_create_from_memory2(
                data.as_ptr() as *const c_void,
                data.len(),
                Some(ffi::openmpt_log_func_silent),
                ptr::null_mut(),
                Some(ffi::openmpt_error_func_ignore),
                ptr::null_mut(),
                &mut error,
                &mut message,
                ptr::null(),
            )
        };

        match NonNull::new(raw) {
            Some(module) => Ok(module),
            None => {
                // SAFETY: `message` is null or a library-owned string.
                let reason = unsafe { take_string(message) }
                    .filter(|reason| !reason.is_empty())
                    .unwrap_or_else(|| format!("libopenmpt error {}", error));
                Err(EngineError::invalid_file(path, reason))
            }
        }
    }
}

impl ModuleEngine for OpenMptEngine {
    fn name(&self) -> &str {
        "libopenmpt"
    }

    fn can_play(&self, path: &Path) -> bool {
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Cannot open file for probing");
                return false;
            }
        };
        let file_size = file.metadata().map(|m| m.len()).unwrap_or(0);

        // SAFETY: no arguments, returns a plain integer.
        let wanted = unsafe { ffi::openmpt_probe_file_header_get_recommended_size() };
        let mut header = Vec::with_capacity(wanted);
        if let Err(e) = file.by_ref().take(wanted as u64).read_to_end(&mut header) {
            debug!(path = %path.display(), error = %e, "Cannot read file header");
            return false;
        }

        match Self::check_header(&header, file_size) {
            ffi::OPENMPT_PROBE_FILE_HEADER_RESULT_SUCCESS => true,
            ffi::OPENMPT_PROBE_FILE_HEADER_RESULT_FAILURE => false,
            ffi::OPENMPT_PROBE_FILE_HEADER_RESULT_WANTMOREDATA => {
                // Some formats can only be identified from the whole file.
                debug!(path = %path.display(), "Header check inconclusive, trying full open");
                self.open(path, &RenderSettings::default()).is_ok()
            }
            other => {
                warn!(path = %path.display(), result = other, "Unexpected header check result");
                false
            }
        }
    }

    fn open(&self, path: &Path, settings: &RenderSettings) -> Result<Box<dyn TrackerModule>> {
        let data = std::fs::read(path)?;
        let raw = Self::create(path, &data)?;
        let settings = settings.clamped();

        // SAFETY: `raw` is a live module handle.
        let seconds = unsafe { ffi::openmpt_module_get_duration_seconds(raw.as_ptr()) };
        let module = OpenMptModule {
            raw,
            single_pass: seconds_to_duration(seconds),
            repeat_count: settings.repeat_count,
            position: Duration::ZERO,
            ended: false,
        };
        module.apply(&settings);

        debug!(
            path = %path.display(),
            duration_ms = module.duration().as_millis() as u64,
            "Opened module"
        );
        Ok(Box::new(module))
    }
}

/// A module opened by libopenmpt.
pub struct OpenMptModule {
    raw: NonNull<ffi::openmpt_module>,
    /// Length of one pass through the song.
    single_pass: Duration,
    repeat_count: u32,
    /// Stream position, counting every pass already played.
    position: Duration,
    /// Set by a seek to the end of the stream.
    ended: bool,
}

// SAFETY: an `openmpt_module` may move between threads as long as it is not
// used from two threads at once, which `&mut self` on the mutating calls and
// the absence of `Sync` guarantee.
unsafe impl Send for OpenMptModule {}

impl OpenMptModule {
    fn ptr(&self) -> *mut ffi::openmpt_module {
        self.raw.as_ptr()
    }

    fn apply(&self, settings: &RenderSettings) {
        // SAFETY: `self.raw` is a live module handle.
        unsafe {
            ffi::openmpt_module_set_repeat_count(self.ptr(), settings.repeat_count as i32);
            ffi::openmpt_module_set_render_param(
                self.ptr(),
                ffi::OPENMPT_MODULE_RENDER_STEREOSEPARATION_PERCENT,
                settings.stereo_separation as i32,
            );
            ffi::openmpt_module_set_render_param(
                self.ptr(),
                ffi::OPENMPT_MODULE_RENDER_INTERPOLATIONFILTER_LENGTH,
                settings.interpolation.taps(),
            );
        }
    }

    fn metadata(&self, key: &str) -> String {
        let Ok(key) = CString::new(key) else {
            return String::new();
        };
        // SAFETY: live handle, NUL-terminated key; the result is freed by
        // `take_string`.
        unsafe { take_string(ffi::openmpt_module_get_metadata(self.ptr(), key.as_ptr())) }
            .unwrap_or_default()
    }

    fn names(
        &self,
        count: u32,
        get: unsafe extern "C" fn(*mut ffi::openmpt_module, i32) -> *const c_char,
    ) -> Vec<String> {
        (0..count as i32)
            // SAFETY: live handle and an index below the reported count.
            .map(|index| unsafe { take_string(get(self.ptr(), index)) }.unwrap_or_default())
            .collect()
    }

    fn count(&self, get: unsafe extern "C" fn(*mut ffi::openmpt_module) -> i32) -> u32 {
        // SAFETY: live handle.
        let value = unsafe { get(self.ptr()) };
        value.max(0) as u32
    }
}

impl TrackerModule for OpenMptModule {
    fn duration(&self) -> Duration {
        self.single_pass * (self.repeat_count + 1)
    }

    fn title(&self) -> String {
        self.metadata("title")
    }

    fn info(&self) -> ModuleInfo {
        let instruments = self.count(ffi::openmpt_module_get_num_instruments);
        let samples = self.count(ffi::openmpt_module_get_num_samples);

        ModuleInfo {
            format_id: self.metadata("type"),
            format_name: self.metadata("type_long"),
            container: self.metadata("container"),
            tracker: self.metadata("tracker"),
            title: self.metadata("title"),
            artist: self.metadata("artist"),
            date: self.metadata("date"),
            message: self.metadata("message"),
            channels: self.count(ffi::openmpt_module_get_num_channels),
            patterns: self.count(ffi::openmpt_module_get_num_patterns),
            orders: self.count(ffi::openmpt_module_get_num_orders),
            instruments,
            samples,
            subsongs: self.count(ffi::openmpt_module_get_num_subsongs),
            instrument_names: self.names(instruments, ffi::openmpt_module_get_instrument_name),
            sample_names: self.names(samples, ffi::openmpt_module_get_sample_name),
        }
    }

    fn read(&mut self, sample_rate: u32, buf: &mut [i16]) -> usize {
        let frames = buf.len() / 2;
        if frames == 0 || sample_rate == 0 || self.ended {
            return 0;
        }
        // SAFETY: live handle; `buf` holds at least `frames * 2` samples.
        let rendered = unsafe {
            ffi::openmpt_module_read_interleaved_stereo(
                self.ptr(),
                sample_rate as i32,
                frames,
                buf.as_mut_ptr(),
            )
        };
        self.position += frames_to_duration(rendered, sample_rate);
        rendered
    }

    fn seek(&mut self, position: Duration) -> Duration {
        let duration = self.duration();
        self.ended = position >= duration;
        if self.ended {
            self.position = duration;
            return duration;
        }

        let (pass, offset) = split_position(position, self.single_pass, self.repeat_count);

        // SAFETY: live handle.
        let reached = unsafe {
            ffi::openmpt_module_set_repeat_count(self.ptr(), (self.repeat_count - pass) as i32);
            ffi::openmpt_module_set_position_seconds(self.ptr(), offset.as_secs_f64())
        };
        self.position = self.single_pass * pass + seconds_to_duration(reached);
        self.position
    }

    fn position(&self) -> Duration {
        self.position
    }
}

impl Drop for OpenMptModule {
    fn drop(&mut self) {
        // SAFETY: the handle came from `create` and is destroyed exactly once.
        unsafe { ffi::openmpt_module_destroy(self.ptr()) };
    }
}

/// Split a stream position into the pass it falls in and the offset
/// within that pass. Positions past the end land at the end of the last
/// pass.
fn split_position(position: Duration, single_pass: Duration, repeat_count: u32) -> (u32, Duration) {
    if single_pass.is_zero() {
        return (0, Duration::ZERO);
    }
    let target = position.min(single_pass * (repeat_count + 1));
    let pass = (target.as_nanos() / single_pass.as_nanos()).min(u128::from(repeat_count)) as u32;
    (pass, target - single_pass * pass)
}

fn frames_to_duration(frames: usize, sample_rate: u32) -> Duration {
    let nanos = frames as u128 * 1_000_000_000 / u128::from(sample_rate.max(1));
    Duration::from_nanos(nanos as u64)
}

fn seconds_to_duration(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
}

/// Copy a library-owned string and release it.
///
/// # Safety
///
/// `raw` must be null or a string returned by libopenmpt that has not been
/// freed yet.
unsafe fn take_string(raw: *const c_char) -> Option<String> {
    if raw.is_null() {
        return None;
    }
    let value = CStr::from_ptr(raw).to_string_lossy().into_owned();
    ffi::openmpt_free_string(raw);
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_conversion_rejects_invalid_values() {
        assert_eq!(seconds_to_duration(f64::NAN), Duration::ZERO);
        assert_eq!(seconds_to_duration(-1.0), Duration::ZERO);
        assert_eq!(seconds_to_duration(2.5), Duration::from_millis(2500));
    }

    #[test]
    fn test_null_string_is_none() {
        assert!(unsafe { take_string(ptr::null()) }.is_none());
    }

    #[test]
    fn test_split_position_across_passes() {
        let pass = Duration::from_secs(10);
        assert_eq!(split_position(Duration::from_secs(4), pass, 2), (0, Duration::from_secs(4)));
        assert_eq!(split_position(Duration::from_secs(25), pass, 2), (2, Duration::from_secs(5)));
        assert_eq!(split_position(Duration::from_secs(99), pass, 2), (2, pass));
        assert_eq!(split_position(Duration::from_secs(10), pass, 0), (0, pass));
        assert_eq!(split_position(Duration::from_secs(3), Duration::ZERO, 1), (0, Duration::ZERO));
    }

    #[test]
    fn test_frames_to_duration() {
        assert_eq!(frames_to_duration(44_100, 44_100), Duration::from_secs(1));
        assert_eq!(frames_to_duration(24, 48_000), Duration::from_micros(500));
    }

    fn fixture(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("square.mod");
        std::fs::write(&path, crate::testing::protracker_module("square test")).unwrap();
        path
    }

    fn render_all(module: &mut dyn TrackerModule) -> usize {
        let mut buf = vec![0i16; 2 * 4096];
        let mut total = 0;
        for _ in 0..10_000 {
            let frames = module.read(44_100, &mut buf);
            if frames == 0 {
                return total;
            }
            total += frames;
        }
        panic!("module never ended");
    }

    #[test]
    fn test_can_play_agrees_with_open() {
        let dir = tempfile::tempdir().unwrap();
        let engine = OpenMptEngine::new();
        let module = fixture(dir.path());
        let text = dir.path().join("notes.txt");
        std::fs::write(&text, b"Greetings to everyone at the party!\n").unwrap();

        assert!(engine.can_play(&module));
        assert!(engine.open(&module, &RenderSettings::default()).is_ok());

        assert!(!engine.can_play(&text));
        let err = engine.open(&text, &RenderSettings::default()).err().unwrap();
        assert!(err.is_invalid_file());

        let missing = dir.path().join("missing.it");
        assert!(!engine.can_play(&missing));
        assert!(matches!(
            engine.open(&missing, &RenderSettings::default()),
            Err(EngineError::Io(_))
        ));
    }

    #[test]
    fn test_info_reports_module_contents() {
        let dir = tempfile::tempdir().unwrap();
        let module = OpenMptEngine::new()
            .open(&fixture(dir.path()), &RenderSettings::default())
            .unwrap();

        assert_eq!(module.title(), "square test");
        let info = module.info();
        assert_eq!(info.format_id, "mod");
        assert!(!info.format_name.is_empty());
        assert_eq!(info.title, "square test");
        assert_eq!(info.channels, 4);
        assert_eq!(info.patterns, 1);
        assert_eq!(info.orders, 1);
        assert_eq!(info.instruments, 0);
        assert!(info.samples >= 1);
        assert_eq!(info.sample_names.len(), info.samples as usize);
        assert_eq!(info.sample_names[0], "square");
    }

    #[test]
    fn test_renders_one_pass() {
        let dir = tempfile::tempdir().unwrap();
        let mut module = OpenMptEngine::new()
            .open(&fixture(dir.path()), &RenderSettings::default())
            .unwrap();
        let duration = module.duration();
        assert!(duration > Duration::from_secs(7) && duration < Duration::from_secs(9));

        let mut buf = vec![0i16; 2 * 1024];
        assert_eq!(module.read(44_100, &mut buf), 1024);
        assert!(buf.iter().any(|&sample| sample != 0));

        let frames = 1024 + render_all(module.as_mut());
        let rendered = frames_to_duration(frames, 44_100);
        assert!(rendered.abs_diff(duration) < Duration::from_millis(200));
        assert!(module.position().abs_diff(duration) < Duration::from_millis(200));
    }

    #[test]
    fn test_seek_within_and_past_the_end() {
        let dir = tempfile::tempdir().unwrap();
        let mut module = OpenMptEngine::new()
            .open(&fixture(dir.path()), &RenderSettings::default())
            .unwrap();
        let duration = module.duration();

        let reached = module.seek(Duration::from_secs(3));
        assert!(reached.abs_diff(Duration::from_secs(3)) < Duration::from_millis(200));
        assert_eq!(module.position(), reached);

        assert_eq!(module.seek(Duration::from_secs(3600)), duration);
        assert_eq!(module.read(44_100, &mut [0i16; 64]), 0);

        module.seek(Duration::ZERO);
        assert!(module.read(44_100, &mut [0i16; 64]) > 0);
    }

    #[test]
    fn test_repeat_count_covers_every_pass() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture(dir.path());
        let engine = OpenMptEngine::new();
        let single = engine
            .open(&path, &RenderSettings::default())
            .unwrap()
            .duration();

        let settings = RenderSettings {
            repeat_count: 1,
            ..RenderSettings::default()
        };
        let mut module = engine.open(&path, &settings).unwrap();
        assert_eq!(module.duration(), single * 2);

        // Seeking into the second pass keeps the remaining stream length.
        let target = single + Duration::from_secs(2);
        let reached = module.seek(target);
        assert!(reached.abs_diff(target) < Duration::from_millis(200));
        let rest = frames_to_duration(render_all(module.as_mut()), 44_100);
        assert!(rest.abs_diff(single * 2 - reached) < Duration::from_millis(300));
    }
}
