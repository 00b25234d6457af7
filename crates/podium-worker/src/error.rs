//! Pipeline error types.
//!
//! Only infrastructure-fatal conditions live here: these are the errors
//! that flip a whole job to its `Error` state. Degraded-but-valid outcomes
//! (speech recognition failure, prosody failure, scoring failure) are
//! represented in stage result types, not as errors.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Media(#[from] podium_media::MediaError),

    #[error("No frames could be extracted from the video")]
    NoFrames,

    #[error("Job store error: {0}")]
    Store(#[from] podium_jobs::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Short human-readable message for the job's `Error` state.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
