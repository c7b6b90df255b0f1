#![allow(dead_code)]

use std::path::PathBuf;

use tfstack::config::{ConfigFile, RawConfigFile};
use tfstack::operation::OperationExecutor;
use tfstack::types::OperationKind;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    /// Start from defaults with the scripts directory set to `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let mut config = RawConfigFile::default();
        config.scripts.dir = Some(dir.into());
        Self { config }
    }

    pub fn with_shell(mut self, shell: &str) -> Self {
        self.config.scripts.shell = shell.to_string();
        self
    }

    pub fn with_script(mut self, kind: OperationKind, script: &str) -> Self {
        let slot = match kind {
            OperationKind::Create => &mut self.config.scripts.create,
            OperationKind::Read => &mut self.config.scripts.read,
            OperationKind::Delete => &mut self.config.scripts.delete,
        };
        *slot = script.to_string();
        self
    }

    pub fn with_known_errors(mut self, kind: OperationKind, errors: &[&str]) -> Self {
        let errors = errors.iter().map(|s| s.to_string()).collect();
        match kind {
            OperationKind::Create => self.config.classifier.known_errors.create = errors,
            OperationKind::Read => self.config.classifier.known_errors.read = errors,
            OperationKind::Delete => self.config.classifier.known_errors.delete = errors,
        }
        self
    }

    pub fn with_success_marker(mut self, marker: &str) -> Self {
        self.config.classifier.success_marker = marker.to_string();
        self
    }

    pub fn with_id_pattern(mut self, pattern: &str) -> Self {
        self.config.classifier.id_pattern = pattern.to_string();
        self
    }

    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.config.jobs.max_concurrent = n;
        self
    }

    pub fn with_timeout(mut self, timeout: &str) -> Self {
        self.config.jobs.timeout = Some(timeout.to_string());
        self
    }

    pub fn with_result_ttl(mut self, ttl: &str) -> Self {
        self.config.jobs.result_ttl = ttl.to_string();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }

    pub fn executor(self) -> OperationExecutor {
        OperationExecutor::from_config(&self.build())
    }
}

/// Executor with default scripts and classifiers.
pub fn default_executor() -> OperationExecutor {
    ConfigFileBuilder::new(".").executor()
}
