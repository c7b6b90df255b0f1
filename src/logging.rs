// src/logging.rs

//! Logging setup for `tfstack` using `tracing` + `tracing-subscriber`.
//!
//! The filter is chosen as follows:
//! 1. `--log-level` sets one level for everything.
//! 2. Otherwise `TFSTACK_LOG` is read as `EnvFilter` directives, so
//!    `TFSTACK_LOG="tfstack=debug,tower_http=warn"` works as well as `debug`.
//! 3. Otherwise `info`.
//!
//! Output goes to stderr.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable consulted when no `--log-level` is given.
pub const LOG_ENV: &str = "TFSTACK_LOG";

const DEFAULT_DIRECTIVES: &str = "info";

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV).ok();
    let directives = resolve_directives(cli_level, env_value.as_deref());

    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("ignoring invalid {LOG_ENV} value '{directives}': {e}");
        EnvFilter::new(DEFAULT_DIRECTIVES)
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(())
}

/// Filter directives for the given CLI flag and `TFSTACK_LOG` value.
pub fn resolve_directives(cli_level: Option<LogLevel>, env_value: Option<&str>) -> String {
    if let Some(level) = cli_level {
        return level.as_str().to_string();
    }

    env_value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_DIRECTIVES)
        .to_string()
}
