use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three operations a provisioning script can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Create,
    Read,
    Delete,
}

impl OperationKind {
    /// Whether the operation takes a resource id argument.
    pub fn requires_resource_id(self) -> bool {
        !matches!(self, OperationKind::Create)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Create => "create",
            OperationKind::Read => "read",
            OperationKind::Delete => "delete",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "create" => Ok(OperationKind::Create),
            "read" => Ok(OperationKind::Read),
            "delete" => Ok(OperationKind::Delete),
            other => Err(format!(
                "invalid operation kind: {other} (expected \"create\", \"read\" or \"delete\")"
            )),
        }
    }
}

/// Lifecycle of a job.
///
/// `Pending -> Running -> Succeeded | Failed`. Transitions only move forward;
/// see [`crate::jobs::JobRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }

    fn rank(self) -> u8 {
        match self {
            JobStatus::Pending => 0,
            JobStatus::Running => 1,
            JobStatus::Succeeded | JobStatus::Failed => 2,
        }
    }

    /// Whether moving from `self` to `next` is a forward transition.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        !self.is_terminal() && next.rank() > self.rank()
    }
}

impl Default for JobStatus {
    fn default() -> Self {
        JobStatus::Pending
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Running => "RUNNING",
            JobStatus::Succeeded => "SUCCEEDED",
            JobStatus::Failed => "FAILED",
        };
        f.write_str(s)
    }
}
