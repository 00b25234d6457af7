//! WAV sample loading.

use std::path::Path;

use crate::error::{InferenceError, InferenceResult};

/// Read a 16 kHz mono WAV file into normalized f32 samples.
///
/// The extractor always produces this format; anything else is a caller
/// error surfaced loudly rather than resampled silently.
pub fn read_wav_mono_16k(path: impl AsRef<Path>) -> InferenceResult<Vec<f32>> {
    let path = path.as_ref();

    let mut reader = hound::WavReader::open(path)
        .map_err(|e| InferenceError::audio(format!("Failed to open {}: {e}", path.display())))?;

    let spec = reader.spec();
    if spec.sample_rate != 16_000 {
        return Err(InferenceError::audio(format!(
            "Expected 16kHz audio, got {}Hz",
            spec.sample_rate
        )));
    }
    if spec.channels != 1 {
        return Err(InferenceError::audio(format!(
            "Expected mono audio, got {} channels",
            spec.channels
        )));
    }

    let num_samples = reader.len() as usize;
    let samples = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            let mut samples = Vec::with_capacity(num_samples);
            for sample in reader.samples::<i32>() {
                let sample = sample
                    .map_err(|e| InferenceError::audio(format!("Failed to read sample: {e}")))?;
                samples.push(sample as f32 / max_val);
            }
            samples
        }
        hound::SampleFormat::Float => {
            let mut samples = Vec::with_capacity(num_samples);
            for sample in reader.samples::<f32>() {
                let sample = sample
                    .map_err(|e| InferenceError::audio(format!("Failed to read sample: {e}")))?;
                samples.push(sample);
            }
            samples
        }
    };

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, sample_rate: u32, channels: u16, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for s in samples {
            writer.write_sample(*s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_reads_normalized_samples() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("a.wav");
        write_wav(&path, 16_000, 1, &[0, 16384, -16384]);

        let samples = read_wav_mono_16k(&path).unwrap();
        assert_eq!(samples.len(), 3);
        assert!((samples[1] - 0.5).abs() < 1e-3);
        assert!((samples[2] + 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_wrong_sample_rate() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("a.wav");
        write_wav(&path, 44_100, 1, &[0]);

        let err = read_wav_mono_16k(&path).unwrap_err();
        assert!(matches!(err, InferenceError::Audio(_)));
    }

    #[test]
    fn test_rejects_stereo() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("a.wav");
        write_wav(&path, 16_000, 2, &[0, 0]);

        let err = read_wav_mono_16k(&path).unwrap_err();
        assert!(matches!(err, InferenceError::Audio(_)));
    }
}
