//! The final analysis report payload.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::rubric::Assessment;
use crate::timeline::AlignedEntry;
use crate::vision::VisionFrame;

/// Headline counters for the analyzed video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisSummary {
    /// Frames the vision stage looked at (including error-marked ones)
    pub total_frames_processed: usize,
    /// Analyzed span, frames / sampling rate
    pub duration_analyzed_sec: f64,
    /// Frames where a face was actually observed
    pub face_detected_frames: usize,
}

/// Everything a completed job hands back to the caller.
///
/// `raw_data` keeps the full per-frame vision sequence for auditability even
/// though `aligned_transcript_data` is the primary product — when speech
/// recognition failed the aligned list is empty and the raw frames are all
/// the caller gets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PresentationReport {
    pub ai_assessment: Assessment,
    pub analysis_summary: AnalysisSummary,
    pub raw_data: Vec<VisionFrame>,
    pub aligned_transcript_data: Vec<AlignedEntry>,
}
