//! Speech segments and per-segment prosody.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One recognized utterance, as returned by the speech model.
///
/// Segments are consumed in model order; `end > start` is expected but not
/// validated here — downstream math must guard the degenerate case instead
/// of dividing by a zero duration. `jitter`/`shimmer` are attached in place
/// by the prosody stage as percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpeechSegment {
    /// Segment start, seconds from audio start
    pub start: f64,
    /// Segment end, seconds from audio start
    pub end: f64,
    /// Transcribed text (possibly empty)
    pub text: String,
    /// Pitch-period instability, percent
    #[serde(default)]
    pub jitter: f64,
    /// Amplitude instability, percent
    #[serde(default)]
    pub shimmer: f64,
}

impl SpeechSegment {
    /// Create a segment with no prosody attached yet.
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            jitter: 0.0,
            shimmer: 0.0,
        }
    }

    /// Segment duration in seconds (may be zero or negative on bad input).
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Vocal stability metrics for one aligned entry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Prosody {
    /// Pitch-period instability, percent (never NaN)
    pub jitter: f64,
    /// Amplitude instability, percent (never NaN)
    pub shimmer: f64,
}
