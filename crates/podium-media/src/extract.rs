//! Audio and frame extraction.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::command::FfmpegCommand;
use crate::error::{MediaError, MediaResult};

/// Sample rate the speech model expects.
pub const AUDIO_SAMPLE_RATE: u32 = 16_000;

/// Demux and resample the audio track to 16 kHz mono 16-bit PCM WAV.
pub async fn extract_audio(video: impl AsRef<Path>, out_wav: impl AsRef<Path>) -> MediaResult<()> {
    let video = video.as_ref();
    let out_wav = out_wav.as_ref();

    if !video.exists() {
        return Err(MediaError::FileNotFound(video.to_path_buf()));
    }

    FfmpegCommand::new(video, out_wav)
        .no_video()
        .audio_codec("pcm_s16le")
        .audio_rate(AUDIO_SAMPLE_RATE)
        .audio_channels(1)
        .run()
        .await?;

    info!("Extracted audio track to {}", out_wav.display());
    Ok(())
}

/// Sample still frames at a fixed rate to sequentially numbered JPEGs.
///
/// Returns the extracted frame paths sorted by index. The caller decides
/// whether an empty result is an error — extraction itself succeeds on a
/// video with no usable frames only when FFmpeg does.
pub async fn extract_frames(
    video: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    fps: u32,
) -> MediaResult<Vec<PathBuf>> {
    let video = video.as_ref();
    let out_dir = out_dir.as_ref();

    if !video.exists() {
        return Err(MediaError::FileNotFound(video.to_path_buf()));
    }

    let pattern = out_dir.join("frame-%04d.jpg");
    FfmpegCommand::new(video, &pattern)
        .video_filter(format!("fps={fps}"))
        .run()
        .await?;

    let mut frames = Vec::new();
    let mut entries = tokio::fs::read_dir(out_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "jpg") {
            frames.push(path);
        }
    }
    frames.sort();

    info!("Extracted {} frames at {} fps", frames.len(), fps);
    Ok(frames)
}
