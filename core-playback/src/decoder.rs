//! # Module Decoder
//!
//! The engine renders whole stereo frames of `i16`. Hosts hand us byte
//! buffers of any length, so rendered audio goes through a small pending
//! buffer: whatever does not fit into the caller's buffer is served first on
//! the next `read`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use bridge_traits::decoder::{AudioParameters, Decoder, SampleFormat};
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bytes::{Buf, BufMut, BytesMut};
use core_engine::{ModuleEngine, RenderSettings, TrackerModule, OUTPUT_CHANNELS};
use core_runtime::logging::strip_path;
use tracing::{debug, trace, warn};

use crate::error::Result;

/// Bytes in one interleaved S16LE stereo frame.
const FRAME_BYTES: usize = OUTPUT_CHANNELS as usize * 2;

/// Upper bound on frames rendered per engine call.
const RENDER_CHUNK_FRAMES: usize = 4096;

/// Decoder adapter for one tracker module file.
///
/// Created cheaply by the factory; the file is only opened by
/// [`initialize`](Decoder::initialize).
pub struct MptDecoder {
    path: PathBuf,
    engine: Arc<dyn ModuleEngine>,
    settings: RenderSettings,
    module: Option<Box<dyn TrackerModule>>,
    params: Option<AudioParameters>,
    total_time: Duration,
    pending: BytesMut,
    scratch: Vec<i16>,
    finished: bool,
}

impl MptDecoder {
    pub fn new(
        path: impl Into<PathBuf>,
        engine: Arc<dyn ModuleEngine>,
        settings: RenderSettings,
    ) -> Self {
        Self {
            path: path.into(),
            engine,
            settings: settings.clamped(),
            module: None,
            params: None,
            total_time: Duration::ZERO,
            pending: BytesMut::new(),
            scratch: Vec::new(),
            finished: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `initialize` has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.module.is_some()
    }

    /// Stream parameters, once initialized.
    pub fn audio_parameters(&self) -> Option<AudioParameters> {
        self.params
    }

    /// Current engine position. Zero before `initialize`.
    pub fn position(&self) -> Duration {
        self.module
            .as_ref()
            .map(|module| module.position())
            .unwrap_or(Duration::ZERO)
    }

    fn open(&mut self) -> Result<AudioParameters> {
        let module = self.engine.open(&self.path, &self.settings)?;

        // Hosts track time in milliseconds.
        self.total_time = Duration::from_millis(module.duration().as_millis() as u64);

        let params = AudioParameters::new(
            self.settings.sample_rate,
            OUTPUT_CHANNELS,
            SampleFormat::S16Le,
        );
        self.params = Some(params);
        self.module = Some(module);
        self.pending.clear();
        self.finished = false;

        Ok(params)
    }
}

impl Decoder for MptDecoder {
    fn initialize(&mut self) -> BridgeResult<AudioParameters> {
        let name = self.path.to_string_lossy().into_owned();
        match self.open() {
            Ok(params) => {
                debug!(
                    file = strip_path(&name),
                    engine = self.engine.name(),
                    duration_ms = self.total_time.as_millis() as u64,
                    sample_rate = params.sample_rate,
                    "Module opened for playback"
                );
                Ok(params)
            }
            Err(e) => {
                warn!(file = strip_path(&name), error = %e, "Engine rejected module");
                Err(BridgeError::from(e))
            }
        }
    }

    fn total_time(&self) -> Duration {
        self.total_time
    }

    fn bitrate(&self) -> u32 {
        self.params
            .map(|params| params.pcm_bitrate_kbps())
            .unwrap_or(0)
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        let Some(module) = self.module.as_mut() else {
            return 0;
        };
        let sample_rate = self.settings.sample_rate;

        let mut written = drain(&mut self.pending, buf);
        while written < buf.len() && !self.finished {
            let frames = ((buf.len() - written) / FRAME_BYTES).clamp(1, RENDER_CHUNK_FRAMES);
            self.scratch.resize(frames * OUTPUT_CHANNELS as usize, 0);

            let rendered = module.read(sample_rate, &mut self.scratch);
            if rendered == 0 {
                trace!("End of module reached");
                self.finished = true;
                break;
            }

            let samples = rendered * OUTPUT_CHANNELS as usize;
            self.pending.reserve(samples * 2);
            for sample in &self.scratch[..samples] {
                self.pending.put_i16_le(*sample);
            }
            written += drain(&mut self.pending, &mut buf[written..]);
        }

        written
    }

    fn seek(&mut self, position: Duration) {
        let Some(module) = self.module.as_mut() else {
            return;
        };
        let target = position.min(self.total_time);
        let reached = module.seek(target);
        trace!(
            requested_ms = position.as_millis() as u64,
            reached_ms = reached.as_millis() as u64,
            "Seek"
        );

        self.pending.clear();
        self.finished = false;
    }
}

/// Move as many pending bytes as fit into `out`.
fn drain(pending: &mut BytesMut, out: &mut [u8]) -> usize {
    let n = pending.len().min(out.len());
    out[..n].copy_from_slice(&pending[..n]);
    pending.advance(n);
    n
}
