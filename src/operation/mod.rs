// src/operation/mod.rs

//! Create / Read / Delete operations over provisioning scripts.
//!
//! - [`executor`] runs one operation end to end: build the script
//!   invocation, run it, classify its output, and map the outcome to an
//!   [`OperationPayload`] or an [`OperationError`](crate::errors::OperationError).
//! - [`backend`] defines the [`OperationBackend`] seam the job dispatcher
//!   executes, so tests can swap in a fake.

pub mod backend;
pub mod executor;

use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::errors::{Result, TfstackError};
use crate::types::OperationKind;

pub use backend::{OperationBackend, OperationFuture};
pub use executor::{
    OperationExecutor, OperationSpec, CREATE_KNOWN_ERRORS, READ_DELETE_KNOWN_ERRORS,
};

/// A validated request to run one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    kind: OperationKind,
    working_dir: PathBuf,
    resource_id: Option<String>,
}

impl OperationRequest {
    /// Build a request, checking that a resource id is present exactly when
    /// the operation needs one.
    pub fn new(
        kind: OperationKind,
        working_dir: impl Into<PathBuf>,
        resource_id: Option<String>,
    ) -> Result<Self> {
        match (kind.requires_resource_id(), resource_id.as_deref()) {
            (true, None) => {
                return Err(TfstackError::InvalidRequest(format!(
                    "{kind} requires a resource id"
                )));
            }
            (true, Some(id)) if id.trim().is_empty() => {
                return Err(TfstackError::InvalidRequest(format!(
                    "{kind} requires a non-empty resource id"
                )));
            }
            (false, Some(_)) => {
                return Err(TfstackError::InvalidRequest(format!(
                    "{kind} does not take a resource id"
                )));
            }
            _ => {}
        }

        Ok(Self {
            kind,
            working_dir: working_dir.into(),
            resource_id,
        })
    }

    pub fn create(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            kind: OperationKind::Create,
            working_dir: working_dir.into(),
            resource_id: None,
        }
    }

    pub fn read(working_dir: impl Into<PathBuf>, resource_id: impl Into<String>) -> Result<Self> {
        Self::new(OperationKind::Read, working_dir, Some(resource_id.into()))
    }

    pub fn delete(working_dir: impl Into<PathBuf>, resource_id: impl Into<String>) -> Result<Self> {
        Self::new(OperationKind::Delete, working_dir, Some(resource_id.into()))
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }
}

/// What a successful operation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationPayload {
    Created { resource_id: String },
    Read { content: Vec<String> },
    Deleted,
}

impl OperationPayload {
    pub fn message(&self) -> &'static str {
        match self {
            OperationPayload::Created { .. } => "TFstack created successfully",
            OperationPayload::Read { .. } => "TFstack read successfully",
            OperationPayload::Deleted => "TFstack deleted successfully",
        }
    }

    pub fn resource_id(&self) -> Option<&str> {
        match self {
            OperationPayload::Created { resource_id } => Some(resource_id),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct PayloadBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    resource_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a [String]>,
}

impl Serialize for OperationPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let content = match self {
            OperationPayload::Read { content } => Some(content.as_slice()),
            _ => None,
        };

        PayloadBody {
            message: self.message(),
            resource_id: self.resource_id(),
            content,
        }
        .serialize(serializer)
    }
}
