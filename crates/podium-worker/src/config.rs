//! Pipeline configuration.

/// Analysis pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Frame sampling rate (frames per second)
    pub frame_rate: u32,
    /// Language hint for speech recognition ("auto" lets the model detect)
    pub language: String,
    /// Emit a frame-progress update every N frames
    pub progress_stride: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            frame_rate: 5,
            language: "en".to_string(),
            progress_stride: 20,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            frame_rate: std::env::var("FRAME_RATE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            language: std::env::var("SPEECH_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
            progress_stride: std::env::var("PROGRESS_STRIDE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20),
        }
    }
}
