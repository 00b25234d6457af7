//! API configuration.

use std::path::PathBuf;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins ("*" allows any, matching the reference deployment)
    pub cors_origins: Vec<String>,
    /// Max request body size (uploads are whole videos)
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    /// Root for per-session upload directories
    pub upload_dir: PathBuf,
    /// Root for per-session frame directories
    pub frame_dir: PathBuf,
    /// Directory holding saved rubric criteria
    pub criteria_dir: PathBuf,
    /// Face-attribute ONNX model path
    pub face_model_path: PathBuf,
    /// Whisper model path
    pub whisper_model_path: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            max_body_size: 200 * 1024 * 1024, // 200MB
            environment: "development".to_string(),
            upload_dir: PathBuf::from("uploads"),
            frame_dir: PathBuf::from("frames"),
            criteria_dir: PathBuf::from("standard"),
            face_model_path: PathBuf::from("models/face_attributes.onnx"),
            whisper_model_path: PathBuf::from("models/ggml-small.bin"),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_size),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            frame_dir: std::env::var("FRAME_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.frame_dir),
            criteria_dir: std::env::var("CRITERIA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.criteria_dir),
            face_model_path: std::env::var("FACE_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.face_model_path),
            whisper_model_path: std::env::var("WHISPER_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.whisper_model_path),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}
