//! The aligned per-utterance timeline.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::speech::Prosody;
use crate::vision::VisionObservation;

/// One row of the merged timeline: a speech segment joined with the vision
/// signals averaged over its time window and its prosody metrics.
///
/// Created exactly once by the aligner and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AlignedEntry {
    pub start: f64,
    pub end: f64,
    pub text: String,
    /// Speaking speed, characters per second (0 when duration <= 0)
    pub speech_rate_cps: f64,
    /// Averaged signals over `[start, end]`, or the no-face marker
    pub vision_avg: VisionObservation,
    pub prosody: Prosody,
}
