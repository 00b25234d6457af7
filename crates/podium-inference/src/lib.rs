//! Long-lived model adapters.
//!
//! This crate wraps the external inference dependencies behind small,
//! synchronous adapter types that are loaded once at startup and shared
//! read-only across jobs:
//! - [`FaceAnalyzer`] — face-attribute ONNX graph, one frame in, named
//!   expression signals (or no-face) out
//! - [`SpeechTranscriber`] — whisper.cpp model, whole audio track in,
//!   timestamped segments out
//! - [`ProsodyExtractor`] — jitter/shimmer measurement over a segment's
//!   slice of the decoded track
//!
//! All calls are blocking; callers on the async runtime are expected to use
//! `spawn_blocking`.

pub mod error;
pub mod prosody;
pub mod speech;
pub mod vision;
pub mod wav;

pub use error::{InferenceError, InferenceResult};
pub use prosody::{ProsodyExtractor, ProsodyMeasure};
pub use speech::SpeechTranscriber;
pub use vision::FaceAnalyzer;
pub use wav::read_wav_mono_16k;
