//! Job store error types.

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from a job store backend.
///
/// The in-memory store never fails; the variants exist for external
/// backends plugged in behind the same trait.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Job store backend error: {0}")]
    Backend(String),
}
