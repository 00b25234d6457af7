//! Job orchestration.
//!
//! One submitted video runs as one sequential background pipeline:
//! audio extraction, frame extraction, per-frame face inference, speech
//! recognition, prosody measurement, alignment, scoring. Stage failures are
//! isolated per the taxonomy in `error.rs` — extraction failures kill the
//! job, recognition/prosody/scoring failures degrade it — and the session
//! workspace is cleaned up exactly once however the stages end.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use podium_jobs::{JobStore, StoreResult};
use podium_media::SessionWorkspace;
use podium_models::{
    default_criteria, AnalysisSummary, Assessment, Criterion, JobId, JobState,
    PresentationReport, SpeechSegment, VisionFrame,
};

use crate::adapters::{MediaExtractor, ProsodyModel, SpeechModel, VisionModel};
use crate::align::align;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::logging::JobLogger;
use crate::scorer::GeminiScorer;

/// What the speech stage produced: segments, or a reason they are missing.
///
/// Recognition failure is a degraded-but-valid outcome, unlike the
/// extraction stages — vision data stands on its own.
struct TranscriptOutcome {
    segments: Vec<SpeechSegment>,
    failure: Option<String>,
}

/// The analysis pipeline and its collaborators.
pub struct AnalysisPipeline {
    store: Arc<dyn JobStore>,
    media: Arc<dyn MediaExtractor>,
    vision: Arc<dyn VisionModel>,
    speech: Arc<dyn SpeechModel>,
    prosody: Arc<dyn ProsodyModel>,
    scorer: Option<Arc<GeminiScorer>>,
    config: PipelineConfig,
}

impl AnalysisPipeline {
    pub fn new(
        store: Arc<dyn JobStore>,
        media: Arc<dyn MediaExtractor>,
        vision: Arc<dyn VisionModel>,
        speech: Arc<dyn SpeechModel>,
        prosody: Arc<dyn ProsodyModel>,
        scorer: Option<Arc<GeminiScorer>>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            media,
            vision,
            speech,
            prosody,
            scorer,
            config,
        }
    }

    /// Record the job as pending and begin asynchronous execution.
    ///
    /// Returns as soon as the job is registered; the pipeline itself runs on
    /// a spawned task. Once started, a job runs to completion or failure —
    /// there is no cancellation.
    pub async fn start(
        self: &Arc<Self>,
        job_id: JobId,
        video_path: PathBuf,
        workspace: SessionWorkspace,
        criteria: Option<Vec<Criterion>>,
    ) -> StoreResult<JoinHandle<()>> {
        self.store.put(job_id.clone()).await?;

        let pipeline = Arc::clone(self);
        Ok(tokio::spawn(async move {
            pipeline.run(job_id, video_path, workspace, criteria).await;
        }))
    }

    /// Run the full stage sequence for one job.
    pub async fn run(
        &self,
        job_id: JobId,
        video_path: PathBuf,
        workspace: SessionWorkspace,
        criteria: Option<Vec<Criterion>>,
    ) {
        let logger = JobLogger::new(&job_id, "presentation_analysis");
        logger.log_start("Starting presentation analysis");

        let outcome = self
            .run_stages(&job_id, &video_path, &workspace, criteria, &logger)
            .await;

        // Temp storage is released exactly once, success or failure.
        workspace.cleanup().await;

        match outcome {
            Ok(report) => {
                metrics::counter!("podium_jobs_completed_total").increment(1);
                logger.log_completion("Analysis complete");
                let state = JobState::Complete {
                    result: Box::new(report),
                };
                if let Err(e) = self.store.update(&job_id, state).await {
                    logger.log_error(&format!("Failed to record completion: {e}"));
                }
            }
            Err(e) => {
                metrics::counter!("podium_jobs_failed_total").increment(1);
                let message = e.user_message();
                logger.log_error(&message);
                if let Err(e) = self.store.update(&job_id, JobState::error(message)).await {
                    logger.log_error(&format!("Failed to record failure: {e}"));
                }
            }
        }
    }

    async fn run_stages(
        &self,
        job_id: &JobId,
        video_path: &Path,
        workspace: &SessionWorkspace,
        criteria: Option<Vec<Criterion>>,
        logger: &JobLogger,
    ) -> PipelineResult<PresentationReport> {
        // Stage 1: audio extraction. Nothing downstream works without it.
        self.store
            .update(job_id, JobState::analyzing("1/6: Extracting audio track..."))
            .await?;
        let duration = self.media.probe_duration(video_path).await?;
        debug!(job_id = %job_id, "Video duration: {:.1}s", duration);

        let audio_path = workspace.audio_path();
        self.media.extract_audio(video_path, &audio_path).await?;

        // Stage 2: frame extraction. A video with no visual signal at all is
        // not a valid degraded result.
        self.store
            .update(job_id, JobState::analyzing("2/6: Extracting video frames..."))
            .await?;
        let frame_paths = self
            .media
            .extract_frames(video_path, workspace.frame_dir(), self.config.frame_rate)
            .await?;
        if frame_paths.is_empty() {
            return Err(PipelineError::NoFrames);
        }

        // Stage 3: per-frame face inference.
        let vision_frames = self.analyze_frames(job_id, &frame_paths, logger).await?;

        // Stage 4: speech recognition over the whole track.
        self.store
            .update(
                job_id,
                JobState::analyzing("4/6: Running speech recognition... (this can take a while)"),
            )
            .await?;
        let transcript = self.transcribe(&audio_path, logger).await;

        // Stage 5: prosody per segment.
        self.store
            .update(job_id, JobState::analyzing("5/6: Analyzing vocal prosody..."))
            .await?;
        let segments = self
            .measure_prosody(&audio_path, transcript.segments, logger)
            .await;

        // Stage 6: alignment and scoring.
        self.store
            .update(job_id, JobState::analyzing("6/6: Aligning data and scoring..."))
            .await?;
        let aligned = align(&vision_frames, &segments);
        let ai_assessment = self.assess(&aligned, criteria, transcript.failure).await;

        let face_detected_frames = vision_frames
            .iter()
            .filter(|f| f.observation.is_face())
            .count();

        Ok(PresentationReport {
            ai_assessment,
            analysis_summary: AnalysisSummary {
                total_frames_processed: vision_frames.len(),
                duration_analyzed_sec: vision_frames.len() as f64 / self.config.frame_rate as f64,
                face_detected_frames,
            },
            raw_data: vision_frames,
            aligned_transcript_data: aligned,
        })
    }

    /// Run face inference frame by frame, sequentially.
    ///
    /// A single frame's failure marks that frame only. Progress counters are
    /// written at a coarse stride to bound status-query overhead.
    async fn analyze_frames(
        &self,
        job_id: &JobId,
        frame_paths: &[PathBuf],
        logger: &JobLogger,
    ) -> PipelineResult<Vec<VisionFrame>> {
        const STAGE_MESSAGE: &str = "3/6: Analyzing facial expressions...";

        let total = frame_paths.len();
        self.store
            .update(
                job_id,
                JobState::analyzing_counted(STAGE_MESSAGE, 0, total as u32),
            )
            .await?;
        logger.log_progress(&format!("Analyzing {total} frames"));

        let frame_rate = self.config.frame_rate as f64;
        let mut frames = Vec::with_capacity(total);
        for (index, path) in frame_paths.iter().enumerate() {
            let vision = Arc::clone(&self.vision);
            let path = path.clone();
            let result = tokio::task::spawn_blocking(move || vision.analyze_frame(&path)).await;

            // Synthetic timestamp from the sampling rate, not the wall clock.
            let time = index as f64 / frame_rate;
            let frame = match result {
                Ok(Ok(Some(signals))) => VisionFrame::face(time, signals),
                Ok(Ok(None)) => VisionFrame::no_face(time, "no face detected"),
                Ok(Err(e)) => {
                    logger.log_warning(&format!("Frame {index} inference failed: {e}"));
                    VisionFrame::no_face(time, e.to_string())
                }
                Err(e) => {
                    logger.log_warning(&format!("Frame {index} inference aborted: {e}"));
                    VisionFrame::no_face(time, "frame inference failed")
                }
            };
            frames.push(frame);

            if index % self.config.progress_stride == 0 || index + 1 == total {
                self.store
                    .update(
                        job_id,
                        JobState::analyzing_counted(STAGE_MESSAGE, (index + 1) as u32, total as u32),
                    )
                    .await
                    .ok();
            }
        }

        Ok(frames)
    }

    /// Run speech recognition; failure yields an empty transcript plus the
    /// reason, never an error.
    async fn transcribe(&self, audio_path: &Path, logger: &JobLogger) -> TranscriptOutcome {
        let speech = Arc::clone(&self.speech);
        let path = audio_path.to_path_buf();
        let language = self.config.language.clone();

        let result =
            tokio::task::spawn_blocking(move || speech.transcribe_file(&path, &language)).await;

        match result {
            Ok(Ok(segments)) => TranscriptOutcome {
                segments,
                failure: None,
            },
            Ok(Err(e)) => {
                logger.log_warning(&format!("Speech recognition failed: {e}"));
                TranscriptOutcome {
                    segments: Vec::new(),
                    failure: Some(e.to_string()),
                }
            }
            Err(e) => {
                logger.log_warning(&format!("Speech recognition aborted: {e}"));
                TranscriptOutcome {
                    segments: Vec::new(),
                    failure: Some("speech recognition aborted".to_string()),
                }
            }
        }
    }

    /// Attach prosody; on failure the segments keep their zeroed defaults.
    async fn measure_prosody(
        &self,
        audio_path: &Path,
        segments: Vec<SpeechSegment>,
        logger: &JobLogger,
    ) -> Vec<SpeechSegment> {
        if segments.is_empty() {
            return segments;
        }

        let prosody = Arc::clone(&self.prosody);
        let path = audio_path.to_path_buf();
        let input = segments.clone();

        match tokio::task::spawn_blocking(move || prosody.attach_prosody(&path, input)).await {
            Ok(Ok(measured)) => measured,
            Ok(Err(e)) => {
                logger.log_warning(&format!("Prosody analysis failed: {e}; using zeroed defaults"));
                segments
            }
            Err(e) => {
                logger.log_warning(&format!("Prosody analysis aborted: {e}; using zeroed defaults"));
                segments
            }
        }
    }

    /// Produce the assessment for the report. Never fails the job.
    async fn assess(
        &self,
        aligned: &[podium_models::AlignedEntry],
        criteria: Option<Vec<Criterion>>,
        transcript_failure: Option<String>,
    ) -> Assessment {
        if let Some(reason) = transcript_failure {
            return Assessment::feedback(format!(
                "Speech recognition failed: {reason}. Gaze and expression data were extracted \
                 normally, but transcript-dependent results are unavailable."
            ));
        }

        let criteria = criteria.unwrap_or_else(default_criteria);
        match &self.scorer {
            Some(scorer) => match scorer.score(aligned, &criteria).await {
                Ok(assessment) => assessment,
                Err(e) => Assessment::error(e.to_string()),
            },
            None => Assessment::feedback(
                "AI scoring is disabled because no scoring API key is configured. Transcript, \
                 gaze/expression, and vocal stability data were extracted normally.",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{
        MockMediaExtractor, MockProsodyModel, MockSpeechModel, MockVisionModel,
    };
    use crate::scorer::{GeminiScorer, ScorerConfig};
    use async_trait::async_trait;
    use podium_inference::InferenceError;
    use podium_jobs::MemoryJobStore;
    use podium_media::MediaError;
    use podium_models::VisionSignals;
    use std::sync::Mutex;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Store wrapper that records every state written to it.
    struct RecordingStore {
        inner: MemoryJobStore,
        history: Mutex<Vec<JobState>>,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                inner: MemoryJobStore::new(),
                history: Mutex::new(Vec::new()),
            }
        }

        fn history(&self) -> Vec<JobState> {
            self.history.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl JobStore for RecordingStore {
        async fn put(&self, id: JobId) -> StoreResult<()> {
            self.inner.put(id).await
        }

        async fn update(&self, id: &JobId, state: JobState) -> StoreResult<()> {
            self.history.lock().unwrap().push(state.clone());
            self.inner.update(id, state).await
        }

        async fn poll(&self, id: &JobId) -> StoreResult<Option<JobState>> {
            self.inner.poll(id).await
        }
    }

    fn media_ok(frames: Vec<PathBuf>) -> MockMediaExtractor {
        let mut media = MockMediaExtractor::new();
        media.expect_probe_duration().returning(|_| Ok(2.0));
        media.expect_extract_audio().returning(|_, _| Ok(()));
        media
            .expect_extract_frames()
            .returning(move |_, _, _| Ok(frames.clone()));
        media
    }

    fn vision_with_smiles(smiles: Vec<f64>) -> MockVisionModel {
        let remaining = Mutex::new(smiles);
        let mut vision = MockVisionModel::new();
        vision.expect_analyze_frame().returning(move |_| {
            let mut remaining = remaining.lock().unwrap();
            let smile = if remaining.is_empty() {
                0.0
            } else {
                remaining.remove(0)
            };
            Ok(Some(VisionSignals {
                smile,
                ..Default::default()
            }))
        });
        vision
    }

    fn prosody_passthrough() -> MockProsodyModel {
        let mut prosody = MockProsodyModel::new();
        prosody
            .expect_attach_prosody()
            .returning(|_, segments| Ok(segments));
        prosody
    }

    fn pipeline(
        store: Arc<dyn JobStore>,
        media: MockMediaExtractor,
        vision: MockVisionModel,
        speech: MockSpeechModel,
        prosody: MockProsodyModel,
        scorer: Option<Arc<GeminiScorer>>,
    ) -> Arc<AnalysisPipeline> {
        Arc::new(AnalysisPipeline::new(
            store,
            Arc::new(media),
            Arc::new(vision),
            Arc::new(speech),
            Arc::new(prosody),
            scorer,
            PipelineConfig::default(),
        ))
    }

    async fn fresh_workspace(root: &tempfile::TempDir) -> SessionWorkspace {
        SessionWorkspace::create(root.path().join("uploads"), root.path().join("frames"))
            .await
            .unwrap()
    }

    fn frame_paths(n: usize) -> Vec<PathBuf> {
        (1..=n)
            .map(|i| PathBuf::from(format!("frame-{i:04}.jpg")))
            .collect()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unreadable_video_is_fatal() {
        let root = tempfile::TempDir::new().unwrap();
        let store = Arc::new(MemoryJobStore::new());

        let mut media = MockMediaExtractor::new();
        media
            .expect_probe_duration()
            .returning(|_| Err(MediaError::InvalidVideo("no duration".into())));

        let pipeline = pipeline(
            store.clone(),
            media,
            MockVisionModel::new(),
            MockSpeechModel::new(),
            MockProsodyModel::new(),
            None,
        );

        let job_id = JobId::new();
        let workspace = fresh_workspace(&root).await;
        let handle = pipeline
            .start(job_id.clone(), PathBuf::from("video.mp4"), workspace, None)
            .await
            .unwrap();
        handle.await.unwrap();

        match store.poll(&job_id).await.unwrap() {
            Some(JobState::Error { message }) => assert!(message.contains("Invalid video")),
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_audio_extraction_failure_is_fatal() {
        let root = tempfile::TempDir::new().unwrap();
        let store = Arc::new(MemoryJobStore::new());

        let mut media = MockMediaExtractor::new();
        media.expect_probe_duration().returning(|_| Ok(2.0));
        media
            .expect_extract_audio()
            .returning(|_, _| Err(MediaError::FfmpegNotFound));

        let pipeline = pipeline(
            store.clone(),
            media,
            MockVisionModel::new(),
            MockSpeechModel::new(),
            MockProsodyModel::new(),
            None,
        );

        let job_id = JobId::new();
        let workspace = fresh_workspace(&root).await;
        pipeline
            .start(job_id.clone(), PathBuf::from("video.mp4"), workspace, None)
            .await
            .unwrap()
            .await
            .unwrap();

        match store.poll(&job_id).await.unwrap() {
            Some(JobState::Error { message }) => {
                assert!(message.contains("FFmpeg not found"));
            }
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_zero_frames_is_fatal() {
        let root = tempfile::TempDir::new().unwrap();
        let store = Arc::new(MemoryJobStore::new());

        let pipeline = pipeline(
            store.clone(),
            media_ok(Vec::new()),
            MockVisionModel::new(),
            MockSpeechModel::new(),
            MockProsodyModel::new(),
            None,
        );

        let job_id = JobId::new();
        let workspace = fresh_workspace(&root).await;
        pipeline
            .start(job_id.clone(), PathBuf::from("video.mp4"), workspace, None)
            .await
            .unwrap()
            .await
            .unwrap();

        match store.poll(&job_id).await.unwrap() {
            Some(JobState::Error { message }) => {
                assert!(message.contains("No frames"));
            }
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_speech_failure_still_completes_with_vision_data() {
        let root = tempfile::TempDir::new().unwrap();
        let store = Arc::new(MemoryJobStore::new());

        let mut speech = MockSpeechModel::new();
        speech
            .expect_transcribe_file()
            .returning(|_, _| Err(InferenceError::speech("model exploded")));

        let pipeline = pipeline(
            store.clone(),
            media_ok(frame_paths(2)),
            vision_with_smiles(vec![0.1, 0.3]),
            speech,
            // Never called: there are no segments to measure.
            MockProsodyModel::new(),
            None,
        );

        let job_id = JobId::new();
        let workspace = fresh_workspace(&root).await;
        pipeline
            .start(job_id.clone(), PathBuf::from("video.mp4"), workspace, None)
            .await
            .unwrap()
            .await
            .unwrap();

        let report = match store.poll(&job_id).await.unwrap() {
            Some(JobState::Complete { result }) => result,
            other => panic!("expected Complete, got {other:?}"),
        };

        assert!(report.aligned_transcript_data.is_empty());
        assert_eq!(report.raw_data.len(), 2);
        assert_eq!(report.analysis_summary.face_detected_frames, 2);
        match &report.ai_assessment {
            Assessment::Feedback { ai_feedback } => {
                assert!(ai_feedback.contains("Speech recognition failed"));
            }
            other => panic!("expected feedback message, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_happy_path_without_scorer() {
        let root = tempfile::TempDir::new().unwrap();
        let store = Arc::new(RecordingStore::new());

        let mut speech = MockSpeechModel::new();
        speech.expect_transcribe_file().returning(|_, _| {
            Ok(vec![SpeechSegment::new(0.0, 1.0, "hi")])
        });

        let mut prosody = MockProsodyModel::new();
        prosody.expect_attach_prosody().returning(|_, mut segments| {
            for segment in &mut segments {
                segment.jitter = 1.0;
                segment.shimmer = 2.0;
            }
            Ok(segments)
        });

        // Two frames at 5 fps: times 0.0 and 0.2, both inside [0, 1].
        let pipeline = pipeline(
            store.clone(),
            media_ok(frame_paths(2)),
            vision_with_smiles(vec![0.1, 0.3]),
            speech,
            prosody,
            None,
        );

        let job_id = JobId::new();
        let workspace = fresh_workspace(&root).await;
        pipeline
            .start(job_id.clone(), PathBuf::from("video.mp4"), workspace, None)
            .await
            .unwrap()
            .await
            .unwrap();

        let report = match store.poll(&job_id).await.unwrap() {
            Some(JobState::Complete { result }) => result,
            other => panic!("expected Complete, got {other:?}"),
        };

        assert_eq!(report.aligned_transcript_data.len(), 1);
        let entry = &report.aligned_transcript_data[0];
        assert_eq!(entry.speech_rate_cps, 2.0);
        assert_eq!(entry.prosody.jitter, 1.0);
        let signals = entry.vision_avg.signals().unwrap();
        assert!((signals.smile - 0.2).abs() < 1e-9);

        assert_eq!(report.analysis_summary.total_frames_processed, 2);
        assert!((report.analysis_summary.duration_analyzed_sec - 0.4).abs() < 1e-9);
        assert!(matches!(report.ai_assessment, Assessment::Feedback { .. }));

        // All six stages reported progress, and the frame counter finished.
        let history = store.history();
        for stage in ["1/6", "2/6", "3/6", "4/6", "5/6", "6/6"] {
            assert!(
                history.iter().any(|state| matches!(
                    state,
                    JobState::Analyzing { message, .. } if message.starts_with(stage)
                )),
                "missing stage {stage}"
            );
        }
        assert!(history.iter().any(|state| matches!(
            state,
            JobState::Analyzing {
                progress: Some(2),
                total: Some(2),
                ..
            }
        )));

        // Terminal state was popped above; a second poll is not-found.
        assert!(store.poll(&job_id).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_single_frame_failure_marks_that_frame_only() {
        let root = tempfile::TempDir::new().unwrap();
        let store = Arc::new(MemoryJobStore::new());

        let mut vision = MockVisionModel::new();
        vision.expect_analyze_frame().returning(|path| {
            if path.to_string_lossy().contains("0001") {
                Err(InferenceError::vision("corrupt frame"))
            } else {
                Ok(Some(VisionSignals::default()))
            }
        });

        let mut speech = MockSpeechModel::new();
        speech.expect_transcribe_file().returning(|_, _| Ok(Vec::new()));

        let pipeline = pipeline(
            store.clone(),
            media_ok(frame_paths(3)),
            vision,
            speech,
            MockProsodyModel::new(),
            None,
        );

        let job_id = JobId::new();
        let workspace = fresh_workspace(&root).await;
        pipeline
            .start(job_id.clone(), PathBuf::from("video.mp4"), workspace, None)
            .await
            .unwrap()
            .await
            .unwrap();

        let report = match store.poll(&job_id).await.unwrap() {
            Some(JobState::Complete { result }) => result,
            other => panic!("expected Complete, got {other:?}"),
        };

        assert_eq!(report.raw_data.len(), 3);
        assert!(!report.raw_data[0].observation.is_face());
        assert!(report.raw_data[1].observation.is_face());
        assert!(report.raw_data[2].observation.is_face());
        assert_eq!(report.analysis_summary.face_detected_frames, 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_scoring_failure_embeds_error_object() {
        let root = tempfile::TempDir::new().unwrap();
        let store = Arc::new(MemoryJobStore::new());

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let scorer = Arc::new(GeminiScorer::new(ScorerConfig {
            api_key: "test-key".into(),
            structured: true,
            base_url: server.uri(),
        }));

        let mut speech = MockSpeechModel::new();
        speech.expect_transcribe_file().returning(|_, _| {
            Ok(vec![SpeechSegment::new(0.0, 1.0, "hello")])
        });

        let pipeline = pipeline(
            store.clone(),
            media_ok(frame_paths(1)),
            vision_with_smiles(vec![0.2]),
            speech,
            prosody_passthrough(),
            Some(scorer),
        );

        let job_id = JobId::new();
        let workspace = fresh_workspace(&root).await;
        pipeline
            .start(job_id.clone(), PathBuf::from("video.mp4"), workspace, None)
            .await
            .unwrap()
            .await
            .unwrap();

        let report = match store.poll(&job_id).await.unwrap() {
            Some(JobState::Complete { result }) => result,
            other => panic!("expected Complete, got {other:?}"),
        };
        assert!(matches!(report.ai_assessment, Assessment::Error { .. }));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_workspace_cleaned_up_on_failure() {
        let root = tempfile::TempDir::new().unwrap();
        let store = Arc::new(MemoryJobStore::new());

        let mut media = MockMediaExtractor::new();
        media
            .expect_probe_duration()
            .returning(|_| Err(MediaError::InvalidVideo("bad".into())));

        let pipeline = pipeline(
            store.clone(),
            media,
            MockVisionModel::new(),
            MockSpeechModel::new(),
            MockProsodyModel::new(),
            None,
        );

        let workspace = fresh_workspace(&root).await;
        let video_dir = workspace.video_dir().to_path_buf();
        let frame_dir = workspace.frame_dir().to_path_buf();
        tokio::fs::write(video_dir.join("video.mp4"), b"data")
            .await
            .unwrap();

        pipeline
            .start(JobId::new(), video_dir.join("video.mp4"), workspace, None)
            .await
            .unwrap()
            .await
            .unwrap();

        assert!(!video_dir.exists());
        assert!(!frame_dir.exists());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_prosody_failure_keeps_zeroed_defaults() {
        let root = tempfile::TempDir::new().unwrap();
        let store = Arc::new(MemoryJobStore::new());

        let mut speech = MockSpeechModel::new();
        speech.expect_transcribe_file().returning(|_, _| {
            Ok(vec![SpeechSegment::new(0.0, 1.0, "hi")])
        });

        let mut prosody = MockProsodyModel::new();
        prosody
            .expect_attach_prosody()
            .returning(|_, _| Err(InferenceError::audio("segment too short")));

        let pipeline = pipeline(
            store.clone(),
            media_ok(frame_paths(1)),
            vision_with_smiles(vec![0.2]),
            speech,
            prosody,
            None,
        );

        let job_id = JobId::new();
        let workspace = fresh_workspace(&root).await;
        pipeline
            .start(job_id.clone(), PathBuf::from("video.mp4"), workspace, None)
            .await
            .unwrap()
            .await
            .unwrap();

        let report = match store.poll(&job_id).await.unwrap() {
            Some(JobState::Complete { result }) => result,
            other => panic!("expected Complete, got {other:?}"),
        };
        assert_eq!(report.aligned_transcript_data[0].prosody.jitter, 0.0);
        assert_eq!(report.aligned_transcript_data[0].prosody.shimmer, 0.0);
    }
}
