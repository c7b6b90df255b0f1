// src/jobs/dispatcher.rs

//! Job dispatch: run operations off the request path and track their state.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::config::JobSettings;
use crate::errors::{OperationErrorKind, Result};
use crate::exec::{LineObserver, TracingObserver};
use crate::operation::{OperationBackend, OperationRequest};

use super::record::{JobId, JobRecord, JobResult};
use super::store::JobStore;

pub type DispatchFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Capability the API layer needs: submit work, look up its state.
///
/// The HTTP handlers only see this trait, so any queue or broker can stand
/// behind it.
pub trait JobDispatcher: Send + Sync {
    /// Accept a request and return its job id. Exactly one operation run
    /// backs each job.
    fn enqueue(&self, request: OperationRequest) -> DispatchFuture<'_, Result<JobId>>;

    /// Current state of a job; `None` if unknown or already evicted.
    fn poll_status<'a>(&'a self, id: &'a JobId) -> DispatchFuture<'a, Option<JobRecord>>;
}

/// Tuning for [`LocalDispatcher`].
#[derive(Debug, Clone, Copy)]
pub struct DispatcherOptions {
    /// Maximum number of operations running at once; clamped to at least 1.
    pub max_concurrent: usize,
    /// Optional deadline per job, measured from when it starts running.
    pub timeout: Option<Duration>,
}

impl Default for DispatcherOptions {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            timeout: None,
        }
    }
}

impl From<&JobSettings> for DispatcherOptions {
    fn from(settings: &JobSettings) -> Self {
        Self {
            max_concurrent: settings.max_concurrent,
            timeout: settings.timeout,
        }
    }
}

/// In-process dispatcher: each job runs as its own Tokio task, bounded by a
/// semaphore, with results kept in a [`JobStore`].
pub struct LocalDispatcher<B: OperationBackend> {
    backend: Arc<B>,
    store: JobStore,
    permits: Arc<Semaphore>,
    timeout: Option<Duration>,
}

impl<B: OperationBackend> LocalDispatcher<B> {
    pub fn new(backend: B, options: DispatcherOptions) -> Self {
        Self::with_store(backend, options, JobStore::new())
    }

    pub fn with_store(backend: B, options: DispatcherOptions, store: JobStore) -> Self {
        Self {
            backend: Arc::new(backend),
            store,
            permits: Arc::new(Semaphore::new(options.max_concurrent.max(1))),
            timeout: options.timeout,
        }
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    /// Record a pending job and spawn its worker task.
    pub async fn submit(&self, request: OperationRequest) -> JobId {
        let id = self.store.insert_pending(request.kind()).await;

        info!(
            job_id = %id,
            kind = %request.kind(),
            resource_id = request.resource_id().unwrap_or("-"),
            "job enqueued"
        );

        let worker = JobWorker {
            id,
            backend: Arc::clone(&self.backend),
            store: self.store.clone(),
            permits: Arc::clone(&self.permits),
            timeout: self.timeout,
        };
        tokio::spawn(worker.run(request));

        id
    }
}

impl<B: OperationBackend> JobDispatcher for LocalDispatcher<B> {
    fn enqueue(&self, request: OperationRequest) -> DispatchFuture<'_, Result<JobId>> {
        Box::pin(async move { Ok(self.submit(request).await) })
    }

    fn poll_status<'a>(&'a self, id: &'a JobId) -> DispatchFuture<'a, Option<JobRecord>> {
        Box::pin(async move { self.store.get(id).await })
    }
}

/// Everything a spawned job task needs.
struct JobWorker<B: OperationBackend> {
    id: JobId,
    backend: Arc<B>,
    store: JobStore,
    permits: Arc<Semaphore>,
    timeout: Option<Duration>,
}

impl<B: OperationBackend> JobWorker<B> {
    async fn run(self, request: OperationRequest) {
        let id = self.id;
        let kind = request.kind();

        let _permit = match Arc::clone(&self.permits).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                self.store
                    .complete(&id, JobResult::Failure("job dispatcher is shut down".to_string()))
                    .await;
                return;
            }
        };

        if !self.store.mark_running(&id).await {
            return;
        }
        info!(job_id = %id, kind = %kind, "job started");

        let observer: Arc<dyn LineObserver> = Arc::new(TracingObserver::new(format!("{id}/{kind}")));
        let backend = Arc::clone(&self.backend);

        // Run the backend in its own task so a panic is reported through the
        // JoinHandle instead of leaving the job Running forever.
        let mut work = tokio::spawn(async move { backend.run_operation(request, observer).await });

        let joined = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, &mut work).await {
                Ok(joined) => joined,
                Err(_) => {
                    // Dropping the operation future kills the child process.
                    work.abort();
                    warn!(job_id = %id, kind = %kind, timeout = ?limit, "job timed out");
                    self.store
                        .complete(&id, JobResult::Failure(format!("job timed out after {limit:?}")))
                        .await;
                    return;
                }
            },
            None => work.await,
        };

        let result = match joined {
            Ok(Ok(payload)) => {
                info!(job_id = %id, kind = %kind, "job succeeded");
                JobResult::Success(payload)
            }
            Ok(Err(err)) => {
                match err.kind() {
                    OperationErrorKind::KnownScriptError => {
                        info!(job_id = %id, kind = %kind, error = %err, "job failed")
                    }
                    OperationErrorKind::UnknownScriptError => {
                        warn!(job_id = %id, kind = %kind, error = %err, "job failed")
                    }
                    OperationErrorKind::ExecutionUnavailable
                    | OperationErrorKind::InconsistentSuccess => {
                        error!(job_id = %id, kind = %kind, error = %err, "job failed")
                    }
                }
                JobResult::Failure(err.to_string())
            }
            Err(join_err) => {
                error!(job_id = %id, kind = %kind, error = %join_err, "job worker aborted");
                JobResult::Failure(format!("job worker aborted: {join_err}"))
            }
        };

        self.store.complete(&id, result).await;
    }
}
