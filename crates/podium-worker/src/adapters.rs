//! Trait seams between the pipeline and its collaborators.
//!
//! The pipeline depends on these traits rather than the concrete media and
//! model adapters so orchestration can be tested with mocks. The concrete
//! implementations delegate to `podium-media` and `podium-inference`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use podium_inference::{
    read_wav_mono_16k, FaceAnalyzer, InferenceError, InferenceResult, ProsodyExtractor,
    SpeechTranscriber,
};
use podium_media::{MediaResult, AUDIO_SAMPLE_RATE};
use podium_models::{SpeechSegment, VisionSignals};

/// Audio/frame extraction boundary.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Duration lookup; failure means the video is unreadable.
    async fn probe_duration(&self, video: &Path) -> MediaResult<f64>;

    /// Demux+resample the audio track to 16 kHz mono PCM WAV.
    async fn extract_audio(&self, video: &Path, out_wav: &Path) -> MediaResult<()>;

    /// Sample frames at a fixed rate; returns paths sorted by index.
    async fn extract_frames(&self, video: &Path, out_dir: &Path, fps: u32)
        -> MediaResult<Vec<PathBuf>>;
}

/// Per-frame face inference boundary. Calls are blocking.
#[cfg_attr(test, mockall::automock)]
pub trait VisionModel: Send + Sync {
    /// `Ok(None)` means no face in the frame.
    fn analyze_frame(&self, image: &Path) -> InferenceResult<Option<VisionSignals>>;
}

/// Whole-track speech recognition boundary. Calls are blocking.
#[cfg_attr(test, mockall::automock)]
pub trait SpeechModel: Send + Sync {
    fn transcribe_file(&self, audio: &Path, language: &str)
        -> InferenceResult<Vec<SpeechSegment>>;
}

/// Per-segment prosody boundary. Calls are blocking.
#[cfg_attr(test, mockall::automock)]
pub trait ProsodyModel: Send + Sync {
    /// Attach jitter/shimmer percentages to each segment in place.
    fn attach_prosody(
        &self,
        audio: &Path,
        segments: Vec<SpeechSegment>,
    ) -> InferenceResult<Vec<SpeechSegment>>;
}

/// FFmpeg-backed media extraction.
#[derive(Debug, Default)]
pub struct FfmpegMedia;

#[async_trait]
impl MediaExtractor for FfmpegMedia {
    async fn probe_duration(&self, video: &Path) -> MediaResult<f64> {
        podium_media::probe_duration(video).await
    }

    async fn extract_audio(&self, video: &Path, out_wav: &Path) -> MediaResult<()> {
        podium_media::extract_audio(video, out_wav).await
    }

    async fn extract_frames(
        &self,
        video: &Path,
        out_dir: &Path,
        fps: u32,
    ) -> MediaResult<Vec<PathBuf>> {
        podium_media::extract_frames(video, out_dir, fps).await
    }
}

impl VisionModel for FaceAnalyzer {
    fn analyze_frame(&self, image: &Path) -> InferenceResult<Option<VisionSignals>> {
        self.analyze_image(image)
    }
}

impl SpeechModel for SpeechTranscriber {
    fn transcribe_file(
        &self,
        audio: &Path,
        language: &str,
    ) -> InferenceResult<Vec<SpeechSegment>> {
        let samples = read_wav_mono_16k(audio)?;
        self.transcribe(&samples, language)
    }
}

/// Prosody measurement over the extracted WAV track.
#[derive(Debug)]
pub struct WavProsody {
    extractor: ProsodyExtractor,
}

impl WavProsody {
    pub fn new() -> Self {
        Self {
            extractor: ProsodyExtractor::new(AUDIO_SAMPLE_RATE),
        }
    }
}

impl Default for WavProsody {
    fn default() -> Self {
        Self::new()
    }
}

impl ProsodyModel for WavProsody {
    fn attach_prosody(
        &self,
        audio: &Path,
        mut segments: Vec<SpeechSegment>,
    ) -> InferenceResult<Vec<SpeechSegment>> {
        if segments.is_empty() {
            return Ok(segments);
        }

        let samples = read_wav_mono_16k(audio)
            .map_err(|e| InferenceError::audio(format!("Prosody decode: {e}")))?;

        for segment in &mut segments {
            // NaN measurements (silent or too-short slices) become 0 here.
            let prosody = self
                .extractor
                .measure(&samples, segment.start, segment.end)
                .to_percent();
            segment.jitter = prosody.jitter;
            segment.shimmer = prosody.shimmer;
        }

        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_sine_wav(path: &Path, seconds: f64) {
        let spec = hound_spec();
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        let n = (seconds * AUDIO_SAMPLE_RATE as f64) as usize;
        for i in 0..n {
            let t = i as f64 / AUDIO_SAMPLE_RATE as f64;
            let s = (0.5 * (2.0 * std::f64::consts::PI * 150.0 * t).sin() * 32767.0) as i16;
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn hound_spec() -> hound::WavSpec {
        hound::WavSpec {
            channels: 1,
            sample_rate: AUDIO_SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        }
    }

    #[test]
    fn test_attach_prosody_fills_segments() {
        let dir = tempfile::TempDir::new().unwrap();
        let wav = dir.path().join("audio.wav");
        write_sine_wav(&wav, 1.0);

        let segments = vec![SpeechSegment::new(0.0, 0.8, "steady voice")];
        let segments = WavProsody::new().attach_prosody(&wav, segments).unwrap();

        assert!(segments[0].jitter.is_finite());
        assert!(segments[0].shimmer.is_finite());
        assert!(segments[0].jitter >= 0.0);
    }

    #[test]
    fn test_attach_prosody_zeroes_unmeasurable_segment() {
        let dir = tempfile::TempDir::new().unwrap();
        let wav = dir.path().join("audio.wav");
        write_sine_wav(&wav, 1.0);

        // Window entirely past the end of the track.
        let segments = vec![SpeechSegment::new(5.0, 6.0, "off the end")];
        let segments = WavProsody::new().attach_prosody(&wav, segments).unwrap();

        assert_eq!(segments[0].jitter, 0.0);
        assert_eq!(segments[0].shimmer, 0.0);
    }

    #[test]
    fn test_attach_prosody_empty_passthrough() {
        let segments = WavProsody::new()
            .attach_prosody(Path::new("/nonexistent.wav"), Vec::new())
            .unwrap();
        assert!(segments.is_empty());
    }
}
