//! Per-session temporary storage.
//!
//! Each submitted video gets its own upload directory and frame directory
//! keyed by a fresh session id, so concurrent jobs never share filesystem
//! state. Cleanup runs exactly once when the pipeline finishes; `Drop`
//! backstops it if the owning task unwinds first.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::MediaResult;

/// Owned temporary directories for one analysis session.
#[derive(Debug)]
pub struct SessionWorkspace {
    session_id: String,
    video_dir: PathBuf,
    frame_dir: PathBuf,
    cleaned: AtomicBool,
}

impl SessionWorkspace {
    /// Create fresh session directories under the given roots.
    pub async fn create(
        upload_root: impl AsRef<Path>,
        frame_root: impl AsRef<Path>,
    ) -> MediaResult<Self> {
        let session_id = Uuid::new_v4().to_string();
        let video_dir = upload_root.as_ref().join(&session_id);
        let frame_dir = frame_root.as_ref().join(&session_id);

        tokio::fs::create_dir_all(&video_dir).await?;
        tokio::fs::create_dir_all(&frame_dir).await?;

        Ok(Self {
            session_id,
            video_dir,
            frame_dir,
            cleaned: AtomicBool::new(false),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Directory holding the uploaded video.
    pub fn video_dir(&self) -> &Path {
        &self.video_dir
    }

    /// Directory holding extracted frames (and the extracted audio track).
    pub fn frame_dir(&self) -> &Path {
        &self.frame_dir
    }

    /// Path for the uploaded video file.
    pub fn video_path(&self, filename: &str) -> PathBuf {
        self.video_dir.join(filename)
    }

    /// Path for the extracted audio track.
    pub fn audio_path(&self) -> PathBuf {
        self.frame_dir.join("audio.wav")
    }

    /// Remove both session directories. Idempotent; later calls are no-ops.
    pub async fn cleanup(&self) {
        if self.cleaned.swap(true, Ordering::SeqCst) {
            return;
        }
        for dir in [&self.video_dir, &self.frame_dir] {
            match tokio::fs::remove_dir_all(dir).await {
                Ok(()) => info!("Removed session directory {}", dir.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove session directory {}: {}", dir.display(), e),
            }
        }
    }
}

impl Drop for SessionWorkspace {
    fn drop(&mut self) {
        // Backstop for tasks that unwind before the explicit cleanup runs.
        if !self.cleaned.swap(true, Ordering::SeqCst) {
            for dir in [&self.video_dir, &self.frame_dir] {
                if let Err(e) = std::fs::remove_dir_all(dir) {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        warn!("Failed to remove session directory {}: {}", dir.display(), e);
                    }
                }
            }
        }
    }
}
