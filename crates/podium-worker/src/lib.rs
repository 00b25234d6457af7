//! Analysis pipeline for submitted presentation videos.
//!
//! This crate provides:
//! - The timeline aligner merging per-frame vision data with per-utterance
//!   speech and prosody data
//! - The job orchestrator sequencing extraction, inference, alignment and
//!   scoring with per-stage failure isolation
//! - The Gemini scoring client
//! - Job logging and configuration

pub mod adapters;
pub mod align;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod scorer;

pub use adapters::{FfmpegMedia, MediaExtractor, ProsodyModel, SpeechModel, VisionModel, WavProsody};
pub use align::align;
pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use logging::JobLogger;
pub use pipeline::AnalysisPipeline;
pub use scorer::{GeminiScorer, ScorerConfig, ScorerError};
