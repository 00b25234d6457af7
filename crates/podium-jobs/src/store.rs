//! The job store trait and the in-memory implementation.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use podium_models::{JobId, JobRecord, JobState};

use crate::error::{StoreError, StoreResult};

/// Per-job status storage.
///
/// `poll` implements the one-shot terminal read: a `Complete` or `Error`
/// state is removed from the store atomically with being returned, so at
/// most one poller receives the terminal payload and any later poll of that
/// id reports not-found. Non-terminal states are returned without mutation.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Register a new job in `Pending` state.
    async fn put(&self, id: JobId) -> StoreResult<()>;

    /// Replace a job's state. Upserts if the job is unknown.
    async fn update(&self, id: &JobId, state: JobState) -> StoreResult<()>;

    /// Read a job's state; pops the entry when it is terminal.
    async fn poll(&self, id: &JobId) -> StoreResult<Option<JobState>>;
}

/// In-process store over a mutex-guarded map.
///
/// Suitable for a single-process deployment: per-key operations are atomic
/// under the lock, including the remove-on-terminal-read.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: Mutex<HashMap<JobId, JobRecord>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, HashMap<JobId, JobRecord>>> {
        self.jobs
            .lock()
            .map_err(|_| StoreError::Backend("job store lock poisoned".to_string()))
    }

    /// Number of tracked jobs (terminal-but-unread included).
    pub fn len(&self) -> usize {
        self.lock().map(|jobs| jobs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn put(&self, id: JobId) -> StoreResult<()> {
        let mut jobs = self.lock()?;
        jobs.insert(id.clone(), JobRecord::new(id));
        Ok(())
    }

    async fn update(&self, id: &JobId, state: JobState) -> StoreResult<()> {
        let mut jobs = self.lock()?;
        match jobs.get_mut(id) {
            Some(record) => record.set_state(state),
            None => {
                debug!(job_id = %id, "Update for unknown job, inserting");
                let mut record = JobRecord::new(id.clone());
                record.set_state(state);
                jobs.insert(id.clone(), record);
            }
        }
        Ok(())
    }

    async fn poll(&self, id: &JobId) -> StoreResult<Option<JobState>> {
        let mut jobs = self.lock()?;
        let terminal = match jobs.get(id) {
            Some(record) => record.state.is_terminal(),
            None => return Ok(None),
        };
        if terminal {
            // One-shot read: the first observer takes the payload with it.
            Ok(jobs.remove(id).map(|record| record.state))
        } else {
            Ok(jobs.get(id).map(|record| record.state.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_pending_polls_repeatedly() {
        let store = MemoryJobStore::new();
        let id = JobId::new();
        store.put(id.clone()).await.unwrap();

        for _ in 0..3 {
            let state = store.poll(&id).await.unwrap().unwrap();
            assert_eq!(state, JobState::Pending);
        }
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_job_is_none() {
        let store = MemoryJobStore::new();
        assert!(store.poll(&JobId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_terminal_state_pops_once() {
        let store = MemoryJobStore::new();
        let id = JobId::new();
        store.put(id.clone()).await.unwrap();
        store
            .update(&id, JobState::error("frame extraction failed"))
            .await
            .unwrap();

        let first = store.poll(&id).await.unwrap();
        assert!(matches!(first, Some(JobState::Error { .. })));

        let second = store.poll(&id).await.unwrap();
        assert!(second.is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_analyzing_does_not_pop() {
        let store = MemoryJobStore::new();
        let id = JobId::new();
        store.put(id.clone()).await.unwrap();
        store
            .update(&id, JobState::analyzing_counted("3/6: analyzing frames", 21, 100))
            .await
            .unwrap();

        assert!(store.poll(&id).await.unwrap().is_some());
        assert!(store.poll(&id).await.unwrap().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_pollers_single_winner() {
        let store = Arc::new(MemoryJobStore::new());
        let id = JobId::new();
        store.put(id.clone()).await.unwrap();
        store
            .update(&id, JobState::error("boom"))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            let id = id.clone();
            handles.push(tokio::spawn(async move { store.poll(&id).await.unwrap() }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_some() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = MemoryJobStore::new();
        let a = JobId::new();
        let b = JobId::new();
        store.put(a.clone()).await.unwrap();
        store.put(b.clone()).await.unwrap();

        store
            .update(&a, JobState::error("a failed"))
            .await
            .unwrap();

        assert!(matches!(
            store.poll(&a).await.unwrap(),
            Some(JobState::Error { .. })
        ));
        assert_eq!(store.poll(&b).await.unwrap().unwrap(), JobState::Pending);
    }
}
