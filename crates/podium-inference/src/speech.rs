//! Speech recognition via whisper.cpp bindings.

use std::path::Path;

use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use podium_models::SpeechSegment;

use crate::error::{InferenceError, InferenceResult};

/// Whisper model wrapper holding the loaded context.
///
/// The context is loaded once at startup and shared read-only; each
/// `transcribe` call creates its own decoding state, so concurrent calls do
/// not contend on shared mutable state.
pub struct SpeechTranscriber {
    context: WhisperContext,
}

impl SpeechTranscriber {
    /// Load a GGUF/GGML whisper model from disk. Called once at startup.
    pub fn load(model_path: impl AsRef<Path>) -> InferenceResult<Self> {
        let model_path = model_path.as_ref();
        if !model_path.exists() {
            return Err(InferenceError::ModelNotFound(model_path.to_path_buf()));
        }

        let path_str = model_path
            .to_str()
            .ok_or_else(|| InferenceError::model_load("Model path is not valid UTF-8"))?;

        let context =
            WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
                .map_err(|e| InferenceError::model_load(format!("Whisper load: {e}")))?;

        info!("Whisper model loaded from {}", model_path.display());

        Ok(Self { context })
    }

    /// Transcribe a mono 16 kHz track into ordered, timestamped segments.
    ///
    /// `language` is a hint like "en" or "ko"; "auto" lets the model detect.
    pub fn transcribe(
        &self,
        samples: &[f32],
        language: &str,
    ) -> InferenceResult<Vec<SpeechSegment>> {
        if samples.is_empty() {
            return Err(InferenceError::speech("Audio track is empty"));
        }

        let mut state = self
            .context
            .create_state()
            .map_err(|e| InferenceError::speech(format!("Whisper state: {e}")))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some(language));
        params.set_translate(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_special(false);

        state
            .full(params, samples)
            .map_err(|e| InferenceError::speech(format!("Whisper decode: {e}")))?;

        // Segment timestamps are centiseconds.
        let mut segments = Vec::new();
        for segment in state.as_iter() {
            let start = segment.start_timestamp() as f64 / 100.0;
            let end = segment.end_timestamp() as f64 / 100.0;
            let text = segment.to_string().trim().to_string();

            debug!("Segment {:.2}-{:.2}: {}", start, end, text);
            segments.push(SpeechSegment::new(start, end, text));
        }

        info!("Recognized {} speech segments", segments.len());
        Ok(segments)
    }
}
