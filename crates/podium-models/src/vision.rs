//! Per-frame vision observations.
//!
//! One `VisionFrame` is produced per extracted still frame. Its `time` is
//! derived from the frame index and the sampling rate, never from the wall
//! clock, so the vision track lines up with speech-segment timestamps.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Named facial/gaze expression signals derived from blendshape scores.
///
/// Gaze signals are roughly in [-1, 1] (0 = facing the camera); the
/// remaining signals are activation scores in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct VisionSignals {
    /// Horizontal gaze offset (positive = viewer's left)
    pub gaze_h: f64,
    /// Vertical gaze offset (positive = up)
    pub gaze_v: f64,
    pub smile: f64,
    pub frown: f64,
    pub brow_up: f64,
    pub brow_down: f64,
    pub jaw_open: f64,
    pub mouth_open: f64,
    pub squint: f64,
}

/// What the face model saw in one frame: a full signal set, or an error
/// marker when no face was found (or the frame's inference failed).
///
/// Serialized untagged so a face frame is a flat signal record and a no-face
/// frame is `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum VisionObservation {
    Face(VisionSignals),
    NoFace { error: String },
}

impl VisionObservation {
    /// Build the no-face marker with a reason.
    pub fn no_face(reason: impl Into<String>) -> Self {
        Self::NoFace {
            error: reason.into(),
        }
    }

    /// Signals when a face was observed.
    pub fn signals(&self) -> Option<&VisionSignals> {
        match self {
            Self::Face(signals) => Some(signals),
            Self::NoFace { .. } => None,
        }
    }

    /// True when a face was observed in this frame.
    pub fn is_face(&self) -> bool {
        matches!(self, Self::Face(_))
    }
}

/// One sampled frame on the vision timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VisionFrame {
    /// Seconds from video start (frame index / sampling rate)
    pub time: f64,
    #[serde(flatten)]
    pub observation: VisionObservation,
}

impl VisionFrame {
    /// Create a frame carrying observed signals.
    pub fn face(time: f64, signals: VisionSignals) -> Self {
        Self {
            time,
            observation: VisionObservation::Face(signals),
        }
    }

    /// Create an error-marker frame.
    pub fn no_face(time: f64, reason: impl Into<String>) -> Self {
        Self {
            time,
            observation: VisionObservation::no_face(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_frame_serializes_flat() {
        let frame = VisionFrame::face(
            0.4,
            VisionSignals {
                smile: 0.5,
                ..Default::default()
            },
        );

        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["time"], 0.4);
        assert_eq!(json["smile"], 0.5);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_no_face_frame_round_trips() {
        let frame = VisionFrame::no_face(1.2, "no face detected");

        let json = serde_json::to_string(&frame).unwrap();
        let back: VisionFrame = serde_json::from_str(&json).unwrap();

        assert_eq!(back.time, 1.2);
        assert!(!back.observation.is_face());
    }

    #[test]
    fn test_signals_accessor() {
        let face = VisionObservation::Face(VisionSignals::default());
        assert!(face.signals().is_some());

        let missing = VisionObservation::no_face("no face detected");
        assert!(missing.signals().is_none());
    }
}
