// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `tfstack`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tfstack",
    version,
    about = "HTTP API that runs Terraform stack scripts as asynchronous jobs.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `tfstack.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory containing the stack scripts. Overrides `TF_DIR` and the
    /// config file.
    #[arg(long, value_name = "DIR")]
    pub tf_dir: Option<PathBuf>,

    /// Address to listen on, e.g. `127.0.0.1:8080`.
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TFSTACK_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate the configuration, print it, and exit without serving.
    #[arg(long)]
    pub check: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
