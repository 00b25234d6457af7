//! Rubric criteria persistence.
//!
//! Named rubrics are stored as JSON files in a flat directory so a
//! competition's criteria can be saved once and reused across uploads. The
//! name is sanitized into a safe filename before touching the filesystem.

use std::path::PathBuf;
use tracing::{info, warn};

use podium_models::Criterion;

use crate::error::{ApiError, ApiResult};

/// Characters stripped from criteria names before use as a filename.
const RESERVED: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Disk-backed store for named rubric criteria.
#[derive(Debug, Clone)]
pub struct CriteriaStore {
    dir: PathBuf,
}

impl CriteriaStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the criteria directory if missing. Called at startup.
    pub async fn ensure_dir(&self) -> ApiResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Save criteria under a name, replacing any previous version.
    pub async fn save(&self, name: &str, criteria: &[Criterion]) -> ApiResult<()> {
        let path = self.path_for(name);
        let json = serde_json::to_vec_pretty(criteria)
            .map_err(|e| ApiError::internal(format!("Criteria serialization: {e}")))?;
        tokio::fs::write(&path, json).await?;
        info!("Saved criteria to {}", path.display());
        Ok(())
    }

    /// Load criteria by name; None when the name was never saved.
    pub async fn load(&self, name: &str) -> ApiResult<Option<Vec<Criterion>>> {
        let path = self.path_for(name);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(criteria) => Ok(Some(criteria)),
            Err(e) => {
                warn!("Criteria file {} is corrupt: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_name(name)))
    }
}

/// Turn an arbitrary rubric name into a safe flat filename stem.
pub fn sanitize_name(name: &str) -> String {
    // Filtering path separators (and appending ".json" at the call site)
    // leaves no way to escape the criteria directory.
    let safe: String = name
        .chars()
        .filter(|c| !RESERVED.contains(c))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();

    if safe.is_empty() {
        "default_criteria".to_string()
    } else {
        safe
    }
}
