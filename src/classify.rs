// src/classify.rs

//! Output classification.
//!
//! Scripts have no structured output contract: success and failure are read
//! from the exit status plus substring/regex matches over plain stdout lines.

use regex::Regex;

use crate::errors::{Result, TfstackError};
use crate::exec::ProcessResult;

/// Result of interpreting a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedOutcome {
    /// Exit status 0. `extracted_id` is `None` when no marker line was found
    /// or the id pattern did not match exactly once on it.
    Success { extracted_id: Option<String> },
    /// Nonzero exit status. `error_signature` is the first known error found.
    Failure { error_signature: Option<String> },
}

/// How to read a script's output.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    success_marker: String,
    id_pattern: Regex,
    known_errors: Vec<String>,
}

impl ClassifierConfig {
    /// Build a config, checking that `id_pattern` has exactly one capture
    /// group.
    pub fn new(
        success_marker: impl Into<String>,
        id_pattern: Regex,
        known_errors: Vec<String>,
    ) -> Result<Self> {
        // captures_len() counts the implicit whole-match group.
        let groups = id_pattern.captures_len() - 1;
        if groups != 1 {
            return Err(TfstackError::ConfigError(format!(
                "id pattern '{}' must have exactly one capture group (got {})",
                id_pattern.as_str(),
                groups
            )));
        }

        Ok(Self {
            success_marker: success_marker.into(),
            id_pattern,
            known_errors,
        })
    }

    /// Same as [`ClassifierConfig::new`], compiling the pattern first.
    pub fn from_pattern(
        success_marker: impl Into<String>,
        id_pattern: &str,
        known_errors: Vec<String>,
    ) -> Result<Self> {
        let regex = Regex::new(id_pattern).map_err(|e| {
            TfstackError::ConfigError(format!("invalid id pattern '{id_pattern}': {e}"))
        })?;
        Self::new(success_marker, regex, known_errors)
    }

    pub fn success_marker(&self) -> &str {
        &self.success_marker
    }

    pub fn id_pattern(&self) -> &Regex {
        &self.id_pattern
    }

    pub fn known_errors(&self) -> &[String] {
        &self.known_errors
    }
}

/// Classify a finished process.
///
/// Pure and deterministic: identical inputs always produce identical output.
pub fn classify(output: &ProcessResult, config: &ClassifierConfig) -> ClassifiedOutcome {
    if output.success() {
        ClassifiedOutcome::Success {
            extracted_id: extract_id(&output.lines, config),
        }
    } else {
        ClassifiedOutcome::Failure {
            error_signature: find_error_signature(&output.lines, &config.known_errors),
        }
    }
}

/// Apply the id pattern to the first line carrying the success marker.
///
/// More than one match on that line, or an empty capture, is treated the
/// same as none.
fn extract_id(lines: &[String], config: &ClassifierConfig) -> Option<String> {
    let marker_line = lines
        .iter()
        .find(|line| line.contains(config.success_marker.as_str()))?;

    let mut matches = config.id_pattern.captures_iter(marker_line);
    let first = matches.next()?;
    if matches.next().is_some() {
        return None;
    }

    first
        .get(1)
        .map(|m| m.as_str())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// First known error by line order, then by configured pattern order.
fn find_error_signature(lines: &[String], known_errors: &[String]) -> Option<String> {
    lines.iter().find_map(|line| {
        known_errors
            .iter()
            .find(|sig| line.contains(sig.as_str()))
            .cloned()
    })
}
