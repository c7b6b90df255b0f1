// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running external scripts, using
//! `tokio::process::Command`, and capturing what they print.
//!
//! - [`runner`] launches a child process, streams its stdout line by line and
//!   returns a [`ProcessResult`] once it exits.
//! - [`observer`] provides the [`LineObserver`] hook invoked for each line.

pub mod observer;
pub mod runner;

pub use observer::{LineObserver, NoopObserver, TracingObserver};
pub use runner::{run_process, ProcessResult};
