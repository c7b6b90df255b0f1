// src/exec/observer.rs

//! Per-line output observers.
//!
//! The process runner hands every decoded stdout line to a [`LineObserver`]
//! before appending it to the result. Observers are a side channel (logging,
//! progress display); they never influence classification.

use tracing::debug;

/// Receives each stdout line as it is read.
pub trait LineObserver: Send + Sync {
    fn on_line(&self, line: &str);
}

impl<F> LineObserver for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_line(&self, line: &str) {
        self(line)
    }
}

/// Observer that ignores all output.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl LineObserver for NoopObserver {
    fn on_line(&self, _line: &str) {}
}

/// Observer that logs every line at `debug`, tagged with a scope string
/// (typically the job id and operation).
#[derive(Debug, Clone)]
pub struct TracingObserver {
    scope: String,
}

impl TracingObserver {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }
}

impl LineObserver for TracingObserver {
    fn on_line(&self, line: &str) {
        debug!(scope = %self.scope, "stdout: {}", line);
    }
}
