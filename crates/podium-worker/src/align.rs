//! Timeline alignment.
//!
//! Merges the fixed-rate vision track with the variable-length speech
//! segments into one row per utterance: the segment's text, its speaking
//! rate, the vision signals averaged over its time window, and its prosody
//! metrics. Pure function of its inputs; safe to re-run.

use podium_models::{
    AlignedEntry, Prosody, SpeechSegment, VisionFrame, VisionObservation, VisionSignals,
};

/// Marker used when a segment's window contains no face observations.
pub const NO_FACE_IN_WINDOW: &str = "no face detected in window";

/// Align per-frame vision data with per-segment speech and prosody data.
///
/// Returns exactly one entry per segment, in segment order. Segments are
/// taken as the speech model produced them — no reordering and no overlap
/// resolution. An empty segment list yields an empty result: a video with
/// no detected speech is "no data", not an error.
pub fn align(frames: &[VisionFrame], segments: &[SpeechSegment]) -> Vec<AlignedEntry> {
    // Drop error-marked frames once, up front.
    let valid: Vec<(f64, &VisionSignals)> = frames
        .iter()
        .filter_map(|frame| frame.observation.signals().map(|s| (frame.time, s)))
        .collect();

    segments
        .iter()
        .map(|segment| {
            let duration = segment.end - segment.start;
            let speech_rate_cps = if duration > 0.0 {
                segment.text.chars().count() as f64 / duration
            } else {
                0.0
            };

            let window: Vec<&VisionSignals> = valid
                .iter()
                .filter(|(time, _)| *time >= segment.start && *time <= segment.end)
                .map(|(_, signals)| *signals)
                .collect();

            let vision_avg = if window.is_empty() {
                VisionObservation::no_face(NO_FACE_IN_WINDOW)
            } else {
                VisionObservation::Face(mean_signals(&window))
            };

            AlignedEntry {
                start: segment.start,
                end: segment.end,
                text: segment.text.clone(),
                speech_rate_cps: round2(speech_rate_cps),
                vision_avg,
                prosody: Prosody {
                    jitter: round3(nan_to_zero(segment.jitter)),
                    shimmer: round3(nan_to_zero(segment.shimmer)),
                },
            }
        })
        .collect()
}

/// Per-signal arithmetic mean, rounded to 3 decimal places.
fn mean_signals(window: &[&VisionSignals]) -> VisionSignals {
    let n = window.len() as f64;
    let mean = |pick: fn(&VisionSignals) -> f64| -> f64 {
        round3(window.iter().map(|s| pick(s)).sum::<f64>() / n)
    };

    VisionSignals {
        gaze_h: mean(|s| s.gaze_h),
        gaze_v: mean(|s| s.gaze_v),
        smile: mean(|s| s.smile),
        frown: mean(|s| s.frown),
        brow_up: mean(|s| s.brow_up),
        brow_down: mean(|s| s.brow_down),
        jaw_open: mean(|s| s.jaw_open),
        mouth_open: mean(|s| s.mouth_open),
        squint: mean(|s| s.squint),
    }
}

/// A real instrument can yield NaN on a silent or too-short slice.
fn nan_to_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
