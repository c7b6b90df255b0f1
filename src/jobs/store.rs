// src/jobs/store.rs

//! In-memory job result store.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::record::{JobId, JobRecord, JobResult};
use crate::types::OperationKind;

/// Shared map of job records. Cloning yields another handle to the same map.
#[derive(Debug, Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<JobId, JobRecord>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh `Pending` record under a newly generated id.
    pub async fn insert_pending(&self, kind: OperationKind) -> JobId {
        let mut jobs = self.jobs.write().await;
        let mut id = JobId::new();
        while jobs.contains_key(&id) {
            id = JobId::new();
        }
        jobs.insert(id, JobRecord::pending(id, kind));
        id
    }

    /// Snapshot of a record.
    pub async fn get(&self, id: &JobId) -> Option<JobRecord> {
        self.jobs.read().await.get(id).cloned()
    }

    pub async fn mark_running(&self, id: &JobId) -> bool {
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(id) {
            Some(record) => {
                let applied = record.mark_running();
                if !applied {
                    warn!(job_id = %id, status = %record.status(), "refusing to mark job running");
                }
                applied
            }
            None => {
                warn!(job_id = %id, "cannot mark unknown job running");
                false
            }
        }
    }

    pub async fn complete(&self, id: &JobId, result: JobResult) -> bool {
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(id) {
            Some(record) => {
                let applied = record.complete(result);
                if !applied {
                    warn!(job_id = %id, status = %record.status(), "job already terminal; result dropped");
                }
                applied
            }
            None => {
                warn!(job_id = %id, "cannot complete unknown job");
                false
            }
        }
    }

    /// Remove terminal records that finished at least `ttl` ago.
    pub async fn evict_expired(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|_, record| !record.is_expired(now, ttl));
        let evicted = before - jobs.len();
        if evicted > 0 {
            debug!(evicted, remaining = jobs.len(), "evicted expired jobs");
        }
        evicted
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}
