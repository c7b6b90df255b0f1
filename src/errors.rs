// src/errors.rs

//! Crate-wide error types.
//!
//! - [`TfstackError`] covers configuration, IO and request validation.
//! - [`ExecutionError`] is raised by the process runner.
//! - [`OperationError`] is the classified failure of a Create/Read/Delete
//!   operation; its `Display` text is what ends up in a failed job record.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TfstackError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TfstackError>;

/// Failure to run an external command to completion.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("failed to launch '{command}' in {working_dir:?}: {source}")]
    LaunchFailed {
        command: String,
        working_dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("output of '{command}' is not valid UTF-8 (line {line})")]
    OutputDecodingFailed { command: String, line: usize },

    #[error("IO error while running '{command}': {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Discriminant of [`OperationError`], handy for matching and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationErrorKind {
    ExecutionUnavailable,
    KnownScriptError,
    UnknownScriptError,
    InconsistentSuccess,
}

/// Classified failure of a single operation.
#[derive(Error, Debug)]
pub enum OperationError {
    /// The script could not be run or its output could not be read.
    #[error("Unable to execute provisioning script: {0}")]
    ExecutionUnavailable(#[from] ExecutionError),

    /// Nonzero exit with a recognised error signature (surfaced verbatim).
    #[error("{0}")]
    KnownScriptError(String),

    #[error("Unknown error occurred during execution of provisioning script")]
    UnknownScriptError,

    /// Zero exit, but the create script did not report a resource id.
    #[error("Provisioning script reported success but produced no identifiable resource_id")]
    InconsistentSuccess,
}

impl OperationError {
    pub fn kind(&self) -> OperationErrorKind {
        match self {
            OperationError::ExecutionUnavailable(_) => OperationErrorKind::ExecutionUnavailable,
            OperationError::KnownScriptError(_) => OperationErrorKind::KnownScriptError,
            OperationError::UnknownScriptError => OperationErrorKind::UnknownScriptError,
            OperationError::InconsistentSuccess => OperationErrorKind::InconsistentSuccess,
        }
    }

    /// The underlying runner error, if this is an `ExecutionUnavailable`.
    pub fn execution_error(&self) -> Option<&ExecutionError> {
        match self {
            OperationError::ExecutionUnavailable(e) => Some(e),
            _ => None,
        }
    }
}
