// src/exec/runner.rs

//! Child process runner.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::ExecutionError;
use crate::exec::observer::LineObserver;

/// Captured stdout and exit status of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    /// Trimmed stdout lines, in the order they were produced.
    pub lines: Vec<String>,
    /// Exit code; `-1` when the process was terminated by a signal.
    pub exit_status: i32,
}

impl ProcessResult {
    pub fn new(lines: Vec<String>, exit_status: i32) -> Self {
        Self { lines, exit_status }
    }

    /// Convenience constructor for tests and fakes.
    pub fn from_lines<I, S>(lines: I, exit_status: i32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            exit_status,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_status == 0
    }
}

/// Run `command` with `args` in `working_dir`, streaming stdout.
///
/// Each stdout line is strictly decoded as UTF-8, trimmed, passed to
/// `observer` and appended to the result. Stderr is drained and logged at
/// debug level but is not part of the result.
///
/// The child is killed if the returned future is dropped before completion,
/// so callers can layer a deadline with `tokio::time::timeout`.
pub async fn run_process(
    command: &str,
    args: &[String],
    working_dir: &Path,
    observer: &dyn LineObserver,
) -> Result<ProcessResult, ExecutionError> {
    let program = resolve_program(command, working_dir);

    info!(
        command,
        ?args,
        working_dir = %working_dir.display(),
        "starting process"
    );

    let mut cmd = Command::new(&program);
    cmd.args(args)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|source| ExecutionError::LaunchFailed {
        command: command.to_string(),
        working_dir: working_dir.to_path_buf(),
        source,
    })?;

    // Drain stderr so the child never blocks on a full pipe.
    if let Some(stderr) = child.stderr.take() {
        let command = command.to_string();
        tokio::spawn(async move {
            let reader = BufReader::new(stderr);
            let mut lines = reader.lines();

            while let Ok(Some(line)) = lines.next_line().await {
                debug!(command = %command, "stderr: {}", line);
            }
        });
    }

    let stdout = child.stdout.take().ok_or_else(|| ExecutionError::Io {
        command: command.to_string(),
        source: std::io::Error::other("stdout was not captured"),
    })?;

    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();
    let mut lines = Vec::new();

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .await
            .map_err(|source| ExecutionError::Io {
                command: command.to_string(),
                source,
            })?;
        if read == 0 {
            break;
        }

        let text = std::str::from_utf8(&buf).map_err(|_| ExecutionError::OutputDecodingFailed {
            command: command.to_string(),
            line: lines.len() + 1,
        })?;

        let line = text.trim();
        observer.on_line(line);
        lines.push(line.to_string());
    }

    let status = child.wait().await.map_err(|source| ExecutionError::Io {
        command: command.to_string(),
        source,
    })?;

    let exit_status = status.code().unwrap_or(-1);

    info!(
        command,
        exit_code = exit_status,
        lines = lines.len(),
        success = status.success(),
        "process exited"
    );

    Ok(ProcessResult { lines, exit_status })
}

/// Resolve relative script paths such as `./create.sh` against the working
/// directory; bare program names are left for `PATH` lookup.
fn resolve_program(command: &str, working_dir: &Path) -> PathBuf {
    let path = Path::new(command);
    if path.is_absolute() || path.components().count() <= 1 {
        return path.to_path_buf();
    }

    let base = std::path::absolute(working_dir).unwrap_or_else(|_| working_dir.to_path_buf());
    base.join(path)
}
