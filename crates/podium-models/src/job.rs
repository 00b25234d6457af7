//! Job identifiers and job states.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::report::PresentationReport;

/// Unique identifier for an analysis job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a job currently is.
///
/// `Pending -> Analyzing -> Complete | Error`. Nothing leaves a terminal
/// state; the store removes terminal entries on their first read instead.
/// There is no cancelled state — a started job runs to completion or
/// failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status")]
pub enum JobState {
    /// Accepted, execution not yet begun
    Pending,
    /// Pipeline running; `progress`/`total` are set during per-frame stages
    Analyzing {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        progress: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        total: Option<u32>,
    },
    /// All stages finished; carries the full report
    Complete { result: Box<PresentationReport> },
    /// An unrecoverable stage failed
    Error { message: String },
}

impl JobState {
    /// In-flight progress state with just a message.
    pub fn analyzing(message: impl Into<String>) -> Self {
        Self::Analyzing {
            message: message.into(),
            progress: None,
            total: None,
        }
    }

    /// In-flight progress state with a counter pair.
    pub fn analyzing_counted(message: impl Into<String>, progress: u32, total: u32) -> Self {
        Self::Analyzing {
            message: message.into(),
            progress: Some(progress),
            total: Some(total),
        }
    }

    /// Failure state with a short human-readable message.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "Pending",
            JobState::Analyzing { .. } => "Analyzing",
            JobState::Complete { .. } => "Complete",
            JobState::Error { .. } => "Error",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Complete { .. } | JobState::Error { .. })
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tracked job: its current state plus bookkeeping timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub state: JobState,
    /// When the job was submitted
    pub created_at: DateTime<Utc>,
    /// When the state last changed
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    /// Create a new pending record.
    pub fn new(id: JobId) -> Self {
        let now = Utc::now();
        Self {
            id,
            state: JobState::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the state and bump the updated_at timestamp.
    pub fn set_state(&mut self, state: JobState) {
        self.state = state;
        self.updated_at = Utc::now();
    }
}
