//! FFmpeg CLI wrapper for media extraction.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - Audio demux/resample and fixed-rate frame sampling
//! - FFprobe duration lookup
//! - Per-session temporary workspaces with exactly-once cleanup

pub mod command;
pub mod error;
pub mod extract;
pub mod probe;
pub mod workspace;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand};
pub use error::{MediaError, MediaResult};
pub use extract::{extract_audio, extract_frames, AUDIO_SAMPLE_RATE};
pub use probe::probe_duration;
pub use workspace::SessionWorkspace;
