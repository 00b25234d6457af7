//! Face-attribute inference via ONNX Runtime.
//!
//! The adapter expects a graph taking one `1x3x256x256` RGB tensor in
//! [0, 1] and producing a `blendshapes` output of 52 ARKit-style category
//! scores (MediaPipe face-landmarker vocabulary, `BLENDSHAPE_NAMES` order)
//! plus an optional `confidence` output with a face-presence score.
//! `analyze_image` returns `Ok(None)` when no face is present — that is a
//! result, not an error.

use std::path::Path;
use std::sync::Mutex;

use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::{Tensor, Value};
use tracing::info;

use podium_models::VisionSignals;

use crate::error::{InferenceError, InferenceResult};

/// Model input edge length.
const INPUT_SIZE: u32 = 256;

/// Face-presence score below which a frame counts as "no face".
const PRESENCE_THRESHOLD: f32 = 0.5;

/// Blendshape category names in model output order.
///
/// This is the MediaPipe face-landmarker vocabulary. Categories the model
/// does not emit score 0 when picked.
pub const BLENDSHAPE_NAMES: [&str; 52] = [
    "_neutral",
    "browDownLeft",
    "browDownRight",
    "browInnerUp",
    "browOuterUpLeft",
    "browOuterUpRight",
    "cheekPuff",
    "cheekSquintLeft",
    "cheekSquintRight",
    "eyeBlinkLeft",
    "eyeBlinkRight",
    "eyeLookDownLeft",
    "eyeLookDownRight",
    "eyeLookInLeft",
    "eyeLookInRight",
    "eyeLookOutLeft",
    "eyeLookOutRight",
    "eyeLookUpLeft",
    "eyeLookUpRight",
    "eyeSquintLeft",
    "eyeSquintRight",
    "eyeWideLeft",
    "eyeWideRight",
    "jawForward",
    "jawLeft",
    "jawOpen",
    "jawRight",
    "mouthClose",
    "mouthDimpleLeft",
    "mouthDimpleRight",
    "mouthFrownLeft",
    "mouthFrownRight",
    "mouthFunnel",
    "mouthLeft",
    "mouthLowerDownLeft",
    "mouthLowerDownRight",
    "mouthPressLeft",
    "mouthPressRight",
    "mouthPucker",
    "mouthRight",
    "mouthRollLower",
    "mouthRollUpper",
    "mouthShrugLower",
    "mouthShrugUpper",
    "mouthSmileLeft",
    "mouthSmileRight",
    "mouthStretchLeft",
    "mouthStretchRight",
    "mouthUpperUpLeft",
    "mouthUpperUpRight",
    "noseSneerLeft",
    "noseSneerRight",
];

/// ONNX Runtime wrapper holding the loaded face-attribute model.
///
/// Sessions are not safe for concurrent `run` calls, so inference is
/// serialized through a mutex; the analyzer itself is shared via `Arc`.
pub struct FaceAnalyzer {
    session: Mutex<Session>,
}

impl FaceAnalyzer {
    /// Load the model from disk. Called once at startup.
    pub fn load(model_path: impl AsRef<Path>) -> InferenceResult<Self> {
        let model_path = model_path.as_ref();
        if !model_path.exists() {
            return Err(InferenceError::ModelNotFound(model_path.to_path_buf()));
        }

        let model_bytes = std::fs::read(model_path)?;

        let session = Session::builder()
            .map_err(|e| InferenceError::model_load(format!("ORT session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::model_load(format!("ORT opt level: {e}")))?
            .commit_from_memory(model_bytes.as_slice())
            .map_err(|e| InferenceError::model_load(format!("ORT load model: {e}")))?;

        info!("Face model loaded from {}", model_path.display());

        Ok(Self {
            session: Mutex::new(session),
        })
    }

    /// Analyze a single still frame.
    ///
    /// Returns `Ok(None)` when no face is found in the frame.
    pub fn analyze_image(&self, image_path: &Path) -> InferenceResult<Option<VisionSignals>> {
        let input = preprocess(image_path)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| InferenceError::vision("ORT session poisoned"))?;

        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| InferenceError::vision(format!("ORT run failed: {e}")))?;

        if let Some(confidence) = outputs.get("confidence") {
            let (_, data) = confidence
                .try_extract_tensor::<f32>()
                .map_err(|e| InferenceError::vision(format!("ORT extract confidence: {e}")))?;
            if data.first().copied().unwrap_or(0.0) < PRESENCE_THRESHOLD {
                return Ok(None);
            }
        }

        let scores = outputs
            .get("blendshapes")
            .ok_or_else(|| InferenceError::vision("Missing blendshapes output"))?;
        let scores = extract_scores(scores)?;

        Ok(Some(derive_signals(&scores)))
    }
}

/// Decode and resize an image into a `1x3xHxW` tensor in [0, 1].
fn preprocess(image_path: &Path) -> InferenceResult<Value> {
    let img = image::open(image_path)
        .map_err(|e| InferenceError::vision(format!("Image decode failed: {e}")))?;
    let resized = img.resize_exact(INPUT_SIZE, INPUT_SIZE, image::imageops::FilterType::Triangle);
    let rgb = resized.to_rgb8();

    let (w, h) = (INPUT_SIZE as usize, INPUT_SIZE as usize);
    let mut chw_data: Vec<f32> = Vec::with_capacity(3 * h * w);

    // HWC -> CHW with normalization to [0, 1]
    for c in 0..3 {
        for y in 0..h {
            for x in 0..w {
                let pixel = rgb.get_pixel(x as u32, y as u32);
                chw_data.push(pixel[c] as f32 / 255.0);
            }
        }
    }

    let shape = vec![1usize, 3, h, w];
    Tensor::from_array((shape, chw_data.into_boxed_slice()))
        .map(Value::from)
        .map_err(|e| InferenceError::vision(format!("ORT tensor: {e}")))
}

/// Extract the 52 blendshape scores, accepting `[1, 52]` or `[52]`.
fn extract_scores(output: &Value) -> InferenceResult<Vec<f32>> {
    let (shape, data) = output
        .try_extract_tensor::<f32>()
        .map_err(|e| InferenceError::vision(format!("ORT extract: {e}")))?;

    let count = match shape.len() {
        2 if shape[0] == 1 => shape[1] as usize,
        1 => shape[0] as usize,
        _ => {
            return Err(InferenceError::vision(format!(
                "Unexpected blendshapes output shape: {shape:?}"
            )))
        }
    };

    if count != BLENDSHAPE_NAMES.len() || data.len() < count {
        return Err(InferenceError::vision(format!(
            "Expected {} blendshape scores, got {count}",
            BLENDSHAPE_NAMES.len()
        )));
    }

    Ok(data[..count].to_vec())
}

/// Derive the named expression signals from raw blendshape scores.
pub fn derive_signals(scores: &[f32]) -> VisionSignals {
    let pick = |name: &str| -> f64 {
        BLENDSHAPE_NAMES
            .iter()
            .position(|n| *n == name)
            .and_then(|i| scores.get(i))
            .map(|s| *s as f64)
            .unwrap_or(0.0)
    };

    let gaze_h = ((pick("eyeLookOutLeft") - pick("eyeLookInLeft"))
        + (pick("eyeLookInRight") - pick("eyeLookOutRight")))
        / 2.0;
    let gaze_v = ((pick("eyeLookUpLeft") - pick("eyeLookDownLeft"))
        + (pick("eyeLookUpRight") - pick("eyeLookDownRight")))
        / 2.0;

    VisionSignals {
        gaze_h,
        gaze_v,
        smile: (pick("mouthSmileLeft") + pick("mouthSmileRight")) / 2.0,
        frown: (pick("mouthFrownLeft") + pick("mouthFrownRight")) / 2.0,
        brow_up: (pick("browInnerUp") + pick("browOuterUpLeft") + pick("browOuterUpRight")) / 3.0,
        brow_down: (pick("browDownLeft") + pick("browDownRight")) / 2.0,
        jaw_open: pick("jawOpen"),
        // Not in the 52-category vocabulary; scores 0 unless a model emits it
        mouth_open: pick("mouthOpen"),
        squint: (pick("eyeSquintLeft") + pick("eyeSquintRight")) / 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores_with(names: &[(&str, f32)]) -> Vec<f32> {
        let mut scores = vec![0.0; BLENDSHAPE_NAMES.len()];
        for (name, value) in names {
            let idx = BLENDSHAPE_NAMES.iter().position(|n| n == name).unwrap();
            scores[idx] = *value;
        }
        scores
    }

    #[test]
    fn test_smile_is_mean_of_left_and_right() {
        let scores = scores_with(&[("mouthSmileLeft", 0.4), ("mouthSmileRight", 0.6)]);
        let signals = derive_signals(&scores);
        assert!((signals.smile - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_gaze_h_cancels_when_centered() {
        // Symmetric in/out scores mean the eyes face forward.
        let scores = scores_with(&[
            ("eyeLookOutLeft", 0.2),
            ("eyeLookInLeft", 0.2),
            ("eyeLookInRight", 0.2),
            ("eyeLookOutRight", 0.2),
        ]);
        let signals = derive_signals(&scores);
        assert!(signals.gaze_h.abs() < 1e-6);
    }

    #[test]
    fn test_brow_up_uses_three_categories() {
        let scores = scores_with(&[
            ("browInnerUp", 0.3),
            ("browOuterUpLeft", 0.3),
            ("browOuterUpRight", 0.3),
        ]);
        let signals = derive_signals(&scores);
        assert!((signals.brow_up - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_absent_category_scores_zero() {
        let scores = vec![0.0; BLENDSHAPE_NAMES.len()];
        let signals = derive_signals(&scores);
        assert_eq!(signals.mouth_open, 0.0);
    }

    #[test]
    fn test_load_missing_model() {
        let err = FaceAnalyzer::load("/nonexistent/model.onnx").unwrap_err();
        assert!(matches!(err, InferenceError::ModelNotFound(_)));
    }
}
