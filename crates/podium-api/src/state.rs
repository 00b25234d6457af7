//! Application state.

use std::sync::Arc;

use tracing::warn;

use podium_inference::{FaceAnalyzer, SpeechTranscriber};
use podium_jobs::{JobStore, MemoryJobStore};
use podium_worker::{AnalysisPipeline, FfmpegMedia, GeminiScorer, PipelineConfig, WavProsody};

use crate::config::ApiConfig;
use crate::criteria::CriteriaStore;

/// Shared application state.
///
/// Models are process-wide singletons loaded once here; a load failure
/// aborts startup rather than surfacing later as per-job errors.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<dyn JobStore>,
    pub pipeline: Arc<AnalysisPipeline>,
    pub criteria: Arc<CriteriaStore>,
}

impl AppState {
    /// Create new application state.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let store: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());

        let face = FaceAnalyzer::load(&config.face_model_path)?;
        let speech = SpeechTranscriber::load(&config.whisper_model_path)?;

        let scorer = GeminiScorer::from_env().map(Arc::new);
        if scorer.is_none() {
            warn!("GEMINI_API_KEY not set; AI scoring is disabled");
        }

        let pipeline = AnalysisPipeline::new(
            Arc::clone(&store),
            Arc::new(FfmpegMedia),
            Arc::new(face),
            Arc::new(speech),
            Arc::new(WavProsody::new()),
            scorer,
            PipelineConfig::from_env(),
        );

        let criteria = CriteriaStore::new(&config.criteria_dir);
        criteria.ensure_dir().await?;

        tokio::fs::create_dir_all(&config.upload_dir).await?;
        tokio::fs::create_dir_all(&config.frame_dir).await?;

        Ok(Self {
            config,
            store,
            pipeline: Arc::new(pipeline),
            criteria: Arc::new(criteria),
        })
    }
}
