// src/operation/backend.rs

//! Pluggable operation backend abstraction.
//!
//! The job dispatcher talks to an `OperationBackend` instead of calling the
//! executor directly. Production uses [`OperationExecutor`], which spawns the
//! real scripts; tests can provide a backend that returns canned results.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::errors::OperationError;
use crate::exec::LineObserver;

use super::executor::OperationExecutor;
use super::{OperationPayload, OperationRequest};

pub type OperationFuture<'a> =
    Pin<Box<dyn Future<Output = Result<OperationPayload, OperationError>> + Send + 'a>>;

/// The unit of work backing one job.
pub trait OperationBackend: Send + Sync + 'static {
    /// Run the operation once. No retries.
    fn run_operation(
        &self,
        request: OperationRequest,
        observer: Arc<dyn LineObserver>,
    ) -> OperationFuture<'_>;
}

impl OperationBackend for OperationExecutor {
    fn run_operation(
        &self,
        request: OperationRequest,
        observer: Arc<dyn LineObserver>,
    ) -> OperationFuture<'_> {
        Box::pin(async move { self.execute(&request, observer.as_ref()).await })
    }
}

impl<B: OperationBackend> OperationBackend for Arc<B> {
    fn run_operation(
        &self,
        request: OperationRequest,
        observer: Arc<dyn LineObserver>,
    ) -> OperationFuture<'_> {
        self.as_ref().run_operation(request, observer)
    }
}
