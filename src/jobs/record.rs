// src/jobs/record.rs

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{OperationError, TfstackError};
use crate::operation::OperationPayload;
use crate::types::{JobStatus, OperationKind};

/// Opaque job identifier, minted at enqueue time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
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

impl FromStr for JobId {
    type Err = TfstackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| TfstackError::InvalidRequest(format!("invalid job id '{s}': {e}")))
    }
}

/// Terminal result of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobResult {
    Success(OperationPayload),
    /// The stringified error that ended the job.
    Failure(String),
}

impl JobResult {
    /// The terminal status this result implies.
    pub fn status(&self) -> JobStatus {
        match self {
            JobResult::Success(_) => JobStatus::Succeeded,
            JobResult::Failure(_) => JobStatus::Failed,
        }
    }

    /// JSON form exposed to API callers: the payload object on success, the
    /// error string on failure.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            JobResult::Success(payload) => {
                serde_json::to_value(payload).unwrap_or(serde_json::Value::Null)
            }
            JobResult::Failure(message) => serde_json::Value::String(message.clone()),
        }
    }
}

impl From<Result<OperationPayload, OperationError>> for JobResult {
    fn from(result: Result<OperationPayload, OperationError>) -> Self {
        match result {
            Ok(payload) => JobResult::Success(payload),
            Err(err) => JobResult::Failure(err.to_string()),
        }
    }
}

/// State of one job.
///
/// Fields are private: status only moves forward, and the result is written
/// in the same call that enters a terminal status.
#[derive(Debug, Clone)]
pub struct JobRecord {
    id: JobId,
    kind: OperationKind,
    status: JobStatus,
    result: Option<JobResult>,
    enqueued_at: Instant,
    finished_at: Option<Instant>,
}

impl JobRecord {
    pub fn pending(id: JobId, kind: OperationKind) -> Self {
        Self {
            id,
            kind,
            status: JobStatus::Pending,
            result: None,
            enqueued_at: Instant::now(),
            finished_at: None,
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn result(&self) -> Option<&JobResult> {
        self.result.as_ref()
    }

    pub fn enqueued_at(&self) -> Instant {
        self.enqueued_at
    }

    pub fn finished_at(&self) -> Option<Instant> {
        self.finished_at
    }

    /// `Pending -> Running`. Returns false (and changes nothing) otherwise.
    pub fn mark_running(&mut self) -> bool {
        if self.status != JobStatus::Pending {
            return false;
        }
        self.status = JobStatus::Running;
        true
    }

    /// Enter the terminal status implied by `result`, storing it.
    ///
    /// Returns false if the job is already terminal.
    pub fn complete(&mut self, result: JobResult) -> bool {
        let next = result.status();
        if !self.status.can_transition_to(next) {
            return false;
        }
        self.status = next;
        self.result = Some(result);
        self.finished_at = Some(Instant::now());
        true
    }

    /// Whether this job finished more than `ttl` before `now`.
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        self.finished_at
            .is_some_and(|done| now.saturating_duration_since(done) >= ttl)
    }
}
