//! Detail cache: job id → load state, with at most one fetch in flight per id.
//!
//! Entries are never evicted within a session. A failed fetch returns the
//! entry to `Absent` and leaves a diagnostic, so a later expansion may fetch
//! again; nothing retries on its own.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::models::{JobId, JobRecord};
use crate::pipeline_client::{PipelineApi, PipelineError};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "job", rename_all = "snake_case")]
pub enum DetailState {
    Absent,
    Loading,
    Loaded(JobRecord),
}

/// Proof that the caller moved an entry from `Absent` to `Loading`.
/// Only the holder may complete that load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub job_id: JobId,
    epoch: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheEntryView {
    pub job_id: JobId,
    #[serde(flatten)]
    pub state: DetailState,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureView {
    pub job_id: JobId,
    pub error: String,
}

/// Read-only copy of the cache for presentation and diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct CacheSnapshot {
    pub entries: Vec<CacheEntryView>,
    pub failures: Vec<FailureView>,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<JobId, DetailState>,
    failures: HashMap<JobId, String>,
    /// Bumped on reset so loads started before it are dropped.
    epoch: u64,
}

/// Cheap to clone; clones share the same map.
#[derive(Clone, Default)]
pub struct DetailCache {
    inner: Arc<Mutex<CacheInner>>,
}

impl DetailCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: JobId) -> DetailState {
        self.inner
            .lock()
            .entries
            .get(&id)
            .cloned()
            .unwrap_or(DetailState::Absent)
    }

    #[cfg(test)]
    pub fn loaded(&self, id: JobId) -> Option<JobRecord> {
        match self.state(id) {
            DetailState::Loaded(job) => Some(job),
            _ => None,
        }
    }

    pub fn failure(&self, id: JobId) -> Option<String> {
        self.inner.lock().failures.get(&id).cloned()
    }

    /// Claims the load for `id`. Returns `None` when the entry is already
    /// `Loading` or `Loaded`; the caller must then not fetch.
    pub fn begin_load(&self, id: JobId) -> Option<LoadTicket> {
        let mut inner = self.inner.lock();
        let epoch = inner.epoch;
        match inner.entries.get(&id) {
            Some(DetailState::Loading) | Some(DetailState::Loaded(_)) => {
                debug!("Detail for job {id} already cached or in flight");
                None
            }
            _ => {
                inner.entries.insert(id, DetailState::Loading);
                Some(LoadTicket { job_id: id, epoch })
            }
        }
    }

    /// Applies a finished fetch. Returns false when the ticket is stale.
    pub fn complete(&self, ticket: LoadTicket, result: Result<JobRecord, PipelineError>) -> bool {
        let mut inner = self.inner.lock();
        let id = ticket.job_id;
        if inner.epoch != ticket.epoch || inner.entries.get(&id) != Some(&DetailState::Loading) {
            debug!("Dropping stale detail result for job {id}");
            return false;
        }

        match result {
            Ok(job) => {
                if job.id != id {
                    warn!("Detail for job {id} came back tagged as job {}", job.id);
                }
                inner.failures.remove(&id);
                inner.entries.insert(id, DetailState::Loaded(job));
            }
            Err(e) => {
                warn!("Failed to load job details for job {id}: {e}");
                inner.entries.remove(&id);
                inner.failures.insert(id, e.to_string());
            }
        }
        true
    }

    /// Runs the fetch for a claimed ticket on its own task.
    pub fn spawn_fetch(
        &self,
        pipeline: Arc<dyn PipelineApi>,
        ticket: LoadTicket,
    ) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let result = pipeline.fetch_job_detail(ticket.job_id).await;
            cache.complete(ticket, result);
        })
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        let inner = self.inner.lock();
        let mut entries: Vec<CacheEntryView> = inner
            .entries
            .iter()
            .map(|(id, state)| CacheEntryView {
                job_id: *id,
                state: state.clone(),
            })
            .collect();
        entries.sort_by_key(|e| e.job_id);

        let mut failures: Vec<FailureView> = inner
            .failures
            .iter()
            .map(|(id, error)| FailureView {
                job_id: *id,
                error: error.clone(),
            })
            .collect();
        failures.sort_by_key(|f| f.job_id);

        CacheSnapshot { entries, failures }
    }

    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.failures.clear();
        inner.epoch += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline_client::fake::job;

    #[test]
    fn test_begin_load_claims_only_once() {
        let cache = DetailCache::new();
        assert!(cache.begin_load(JobId(1)).is_some());
        assert_eq!(cache.state(JobId(1)), DetailState::Loading);
        assert!(cache.begin_load(JobId(1)).is_none());
    }

    #[test]
    fn test_loaded_entry_is_never_refetched() {
        let cache = DetailCache::new();
        let ticket = cache.begin_load(JobId(1)).unwrap();
        assert!(cache.complete(ticket, Ok(job(1))));
        assert!(cache.begin_load(JobId(1)).is_none());
        assert_eq!(cache.loaded(JobId(1)), Some(job(1)));
    }

    #[test]
    fn test_failure_returns_to_absent_and_records_diagnostic() {
        let cache = DetailCache::new();
        let ticket = cache.begin_load(JobId(3)).unwrap();
        cache.complete(ticket, Err(PipelineError::NotFound("Job 3".to_string())));
        assert_eq!(cache.state(JobId(3)), DetailState::Absent);
        assert_eq!(cache.failure(JobId(3)).as_deref(), Some("Not found: Job 3"));
        // User-initiated retry is allowed.
        assert!(cache.begin_load(JobId(3)).is_some());
    }

    #[test]
    fn test_success_clears_previous_failure() {
        let cache = DetailCache::new();
        let ticket = cache.begin_load(JobId(3)).unwrap();
        cache.complete(ticket, Err(PipelineError::NotFound("Job 3".to_string())));
        let ticket = cache.begin_load(JobId(3)).unwrap();
        cache.complete(ticket, Ok(job(3)));
        assert!(cache.failure(JobId(3)).is_none());
    }

    #[test]
    fn test_results_land_only_on_their_own_id() {
        let cache = DetailCache::new();
        let a = cache.begin_load(JobId(1)).unwrap();
        let b = cache.begin_load(JobId(2)).unwrap();
        // Completion order is reversed on purpose.
        cache.complete(b, Ok(job(2)));
        cache.complete(a, Ok(job(1)));
        assert_eq!(cache.loaded(JobId(1)).map(|j| j.id), Some(JobId(1)));
        assert_eq!(cache.loaded(JobId(2)).map(|j| j.id), Some(JobId(2)));
    }

    #[test]
    fn test_reset_drops_in_flight_results() {
        let cache = DetailCache::new();
        let ticket = cache.begin_load(JobId(1)).unwrap();
        cache.reset();
        assert!(!cache.complete(ticket, Ok(job(1))));
        assert_eq!(cache.state(JobId(1)), DetailState::Absent);
    }

    #[test]
    fn test_snapshot_is_sorted_by_job_id() {
        let cache = DetailCache::new();
        for id in [5, 2, 9] {
            let ticket = cache.begin_load(JobId(id)).unwrap();
            cache.complete(ticket, Ok(job(id)));
        }
        let ids: Vec<JobId> = cache.snapshot().entries.iter().map(|e| e.job_id).collect();
        assert_eq!(ids, vec![JobId(2), JobId(5), JobId(9)]);
    }
}
