//! Shared data models for the Podium analysis backend.
//!
//! This crate provides Serde-serializable types for:
//! - Per-frame vision observations and derived expression signals
//! - Speech segments with attached prosody measurements
//! - The aligned per-utterance timeline
//! - Rubric criteria and AI assessment payloads
//! - Jobs and job states

pub mod job;
pub mod report;
pub mod rubric;
pub mod speech;
pub mod timeline;
pub mod vision;

// Re-export common types
pub use job::{JobId, JobRecord, JobState};
pub use report::{AnalysisSummary, PresentationReport};
pub use rubric::{default_criteria, Assessment, Criterion, Review, ScoreReport};
pub use speech::{Prosody, SpeechSegment};
pub use timeline::AlignedEntry;
pub use vision::{VisionFrame, VisionObservation, VisionSignals};
