// src/operation/executor.rs

//! Operation executor: one script run, one classified result.

use tracing::{error, info, warn};

use crate::classify::{classify, ClassifiedOutcome, ClassifierConfig};
use crate::config::ConfigFile;
use crate::errors::OperationError;
use crate::exec::{run_process, LineObserver, ProcessResult};
use crate::types::OperationKind;

use super::{OperationPayload, OperationRequest};

/// Error signatures the create script is documented to print.
pub const CREATE_KNOWN_ERRORS: &[&str] = &["error:ExistingWorkspaceContainsResources"];

/// Error signatures the read and delete scripts are documented to print.
pub const READ_DELETE_KNOWN_ERRORS: &[&str] = &["error:IdNotSpecified", "error:WorkspaceNotExist"];

/// Script and output rules for one operation kind.
#[derive(Debug, Clone)]
pub struct OperationSpec {
    pub script: String,
    pub classifier: ClassifierConfig,
}

impl OperationSpec {
    pub fn new(script: impl Into<String>, classifier: ClassifierConfig) -> Self {
        Self {
            script: script.into(),
            classifier,
        }
    }
}

/// Runs Create / Read / Delete scripts and interprets their output.
///
/// Holds no mutable state; a single executor can serve any number of
/// concurrent jobs as long as each uses its own working directory.
#[derive(Debug, Clone)]
pub struct OperationExecutor {
    shell: Option<String>,
    create: OperationSpec,
    read: OperationSpec,
    delete: OperationSpec,
}

impl OperationExecutor {
    /// `shell`, when set, is used as the interpreter: the script path and
    /// the resource id are passed to it as separate arguments.
    pub fn new(
        shell: Option<String>,
        create: OperationSpec,
        read: OperationSpec,
        delete: OperationSpec,
    ) -> Self {
        Self {
            shell,
            create,
            read,
            delete,
        }
    }

    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self {
            shell: cfg.scripts.shell.clone(),
            create: OperationSpec::new(&cfg.scripts.create, cfg.classifiers.create.clone()),
            read: OperationSpec::new(&cfg.scripts.read, cfg.classifiers.read.clone()),
            delete: OperationSpec::new(&cfg.scripts.delete, cfg.classifiers.delete.clone()),
        }
    }

    pub fn spec(&self, kind: OperationKind) -> &OperationSpec {
        match kind {
            OperationKind::Create => &self.create,
            OperationKind::Read => &self.read,
            OperationKind::Delete => &self.delete,
        }
    }

    /// Program and argv for a request.
    pub fn invocation(&self, request: &OperationRequest) -> (String, Vec<String>) {
        let spec = self.spec(request.kind());
        let mut args = Vec::new();

        let command = match &self.shell {
            Some(shell) => {
                args.push(spec.script.clone());
                shell.clone()
            }
            None => spec.script.clone(),
        };

        if let Some(id) = request.resource_id() {
            args.push(id.to_string());
        }

        (command, args)
    }

    /// Run the operation's script and classify the result.
    pub async fn execute(
        &self,
        request: &OperationRequest,
        observer: &dyn LineObserver,
    ) -> Result<OperationPayload, OperationError> {
        let kind = request.kind();
        let (command, args) = self.invocation(request);

        info!(
            kind = %kind,
            resource_id = request.resource_id().unwrap_or("-"),
            "executing operation"
        );

        let output = run_process(&command, &args, request.working_dir(), observer)
            .await
            .map_err(|err| {
                error!(kind = %kind, error = %err, "unable to execute script");
                OperationError::from(err)
            })?;

        self.interpret(kind, &output)
    }

    /// Map a finished script run to the operation's result.
    ///
    /// Pure apart from logging; exposed so the mapping can be exercised
    /// without spawning processes.
    pub fn interpret(
        &self,
        kind: OperationKind,
        output: &ProcessResult,
    ) -> Result<OperationPayload, OperationError> {
        let spec = self.spec(kind);

        match classify(output, &spec.classifier) {
            ClassifiedOutcome::Success { extracted_id } => match kind {
                OperationKind::Create => match extracted_id {
                    Some(resource_id) => Ok(OperationPayload::Created { resource_id }),
                    None => {
                        error!(
                            kind = %kind,
                            marker = spec.classifier.success_marker(),
                            "script exited 0 but no resource id could be extracted"
                        );
                        Err(OperationError::InconsistentSuccess)
                    }
                },
                OperationKind::Read => Ok(OperationPayload::Read {
                    content: output.lines.clone(),
                }),
                OperationKind::Delete => Ok(OperationPayload::Deleted),
            },
            ClassifiedOutcome::Failure {
                error_signature: Some(signature),
            } => {
                info!(kind = %kind, exit_code = output.exit_status, %signature, "script reported a known error");
                Err(OperationError::KnownScriptError(signature))
            }
            ClassifiedOutcome::Failure {
                error_signature: None,
            } => {
                warn!(
                    kind = %kind,
                    exit_code = output.exit_status,
                    last_line = output.lines.last().map(String::as_str).unwrap_or(""),
                    "script failed without a known error signature"
                );
                Err(OperationError::UnknownScriptError)
            }
        }
    }
}
