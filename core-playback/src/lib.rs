//! # Tracker Module Playback
//!
//! [`MptDecoder`] adapts one opened tracker module to the host's
//! [`Decoder`](bridge_traits::Decoder) contract: it reports stream
//! parameters, renders interleaved little-endian 16-bit stereo PCM into the
//! host's byte buffers, and seeks.
//!
//! ```text
//! host decode thread
//!   └─ MptDecoder::read(&mut [u8])
//!        └─ TrackerModule::read(rate, &mut [i16])   (engine)
//! ```

pub mod decoder;
pub mod error;

pub use decoder::MptDecoder;
pub use error::{PlaybackError, Result};
