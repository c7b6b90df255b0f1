use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::Semaphore;
use tfstack::errors::OperationError;
use tfstack::exec::LineObserver;
use tfstack::operation::{OperationBackend, OperationFuture, OperationPayload, OperationRequest};

type Scripted = Box<dyn Fn(&OperationRequest) -> Result<OperationPayload, OperationError> + Send>;

/// A fake backend that:
/// - records every request it was asked to run
/// - answers with queued responses, falling back to a payload that matches
///   the request kind
/// - optionally holds each operation until the test releases it through a
///   semaphore gate, so tests can observe `Running`.
pub struct FakeBackend {
    executed: Arc<Mutex<Vec<OperationRequest>>>,
    responses: Mutex<VecDeque<Scripted>>,
    gate: Option<Arc<Semaphore>>,
}

impl FakeBackend {
    pub fn new(executed: Arc<Mutex<Vec<OperationRequest>>>) -> Self {
        Self {
            executed,
            responses: Mutex::new(VecDeque::new()),
            gate: None,
        }
    }

    /// Each operation waits for one permit on `gate` before answering.
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn respond_with<F>(self, f: F) -> Self
    where
        F: Fn(&OperationRequest) -> Result<OperationPayload, OperationError> + Send + 'static,
    {
        self.responses.lock().unwrap().push_back(Box::new(f));
        self
    }

    fn default_payload(request: &OperationRequest) -> OperationPayload {
        use tfstack::types::OperationKind;
        match request.kind() {
            OperationKind::Create => OperationPayload::Created {
                resource_id: "fake-id".to_string(),
            },
            OperationKind::Read => OperationPayload::Read {
                content: vec![format!("state of {}", request.resource_id().unwrap_or(""))],
            },
            OperationKind::Delete => OperationPayload::Deleted,
        }
    }
}

impl OperationBackend for FakeBackend {
    fn run_operation(
        &self,
        request: OperationRequest,
        observer: Arc<dyn LineObserver>,
    ) -> OperationFuture<'_> {
        Box::pin(async move {
            if let Some(gate) = &self.gate {
                gate.acquire().await.expect("gate closed").forget();
            }

            self.executed.lock().unwrap().push(request.clone());
            observer.on_line("fake backend ran");

            let scripted = self.responses.lock().unwrap().pop_front();
            match scripted {
                Some(f) => f(&request),
                None => Ok(Self::default_payload(&request)),
            }
        })
    }
}
