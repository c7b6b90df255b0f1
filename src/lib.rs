// src/lib.rs

pub mod classify;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod http;
pub mod jobs;
pub mod logging;
pub mod operation;
pub mod types;

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::cli::CliArgs;
use crate::config::{load_and_validate, ConfigFile, ConfigOverrides};
use crate::http::{create_router, AppState};
use crate::jobs::{spawn_reaper, DispatcherOptions, JobDispatcher, LocalDispatcher};
use crate::operation::OperationExecutor;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file, `TF_DIR`, CLI flags)
/// - operation executor and job dispatcher
/// - job reaper
/// - HTTP server
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let overrides = ConfigOverrides::from_cli_and_env(args.tf_dir.clone(), args.bind.clone());
    let cfg = load_and_validate(args.config.as_deref(), &overrides)?;

    if args.check {
        print_config(&cfg);
        return Ok(());
    }

    let executor = OperationExecutor::from_config(&cfg);
    let dispatcher = LocalDispatcher::new(executor, DispatcherOptions::from(&cfg.jobs));

    let reaper = spawn_reaper(
        dispatcher.store().clone(),
        cfg.jobs.result_ttl,
        cfg.jobs.reap_interval,
    );

    let dispatcher: Arc<dyn JobDispatcher> = Arc::new(dispatcher);
    let state = AppState::new(dispatcher, cfg.scripts.dir.clone());
    let router = create_router(state);

    let listener = TcpListener::bind(cfg.server.bind_addr).await?;
    info!(
        addr = %cfg.server.bind_addr,
        tf_dir = %cfg.scripts.dir.display(),
        "tfstack API listening"
    );

    tokio::select! {
        result = axum::serve(listener, router) => {
            if let Err(e) = result {
                error!(error = %e, "HTTP server error");
            }
        }
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                error!(error = %e, "failed to listen for Ctrl+C");
            }
            info!("shutdown requested");
        }
    }

    reaper.abort();
    info!("tfstack exiting");
    Ok(())
}

/// `--check` output: the effective configuration.
fn print_config(cfg: &ConfigFile) {
    println!("tfstack configuration");
    println!("  server.bind_addr = {}", cfg.server.bind_addr);
    println!("  scripts.dir = {}", cfg.scripts.dir.display());
    match &cfg.scripts.shell {
        Some(shell) => println!("  scripts.shell = {shell}"),
        None => println!("  scripts.shell = (none, scripts run directly)"),
    }
    println!("  scripts.create = {}", cfg.scripts.create);
    println!("  scripts.read = {}", cfg.scripts.read);
    println!("  scripts.delete = {}", cfg.scripts.delete);
    println!(
        "  classifier.success_marker = {}",
        cfg.classifiers.create.success_marker()
    );
    println!(
        "  classifier.id_pattern = {}",
        cfg.classifiers.create.id_pattern().as_str()
    );
    println!(
        "  classifier.known_errors.create = {:?}",
        cfg.classifiers.create.known_errors()
    );
    println!(
        "  classifier.known_errors.read = {:?}",
        cfg.classifiers.read.known_errors()
    );
    println!(
        "  classifier.known_errors.delete = {:?}",
        cfg.classifiers.delete.known_errors()
    );
    println!("  jobs.max_concurrent = {}", cfg.jobs.max_concurrent);
    match cfg.jobs.timeout {
        Some(timeout) => println!("  jobs.timeout = {timeout:?}"),
        None => println!("  jobs.timeout = (none)"),
    }
    println!("  jobs.result_ttl = {:?}", cfg.jobs.result_ttl);
    println!("  jobs.reap_interval = {:?}", cfg.jobs.reap_interval);

    debug!("config check complete (not serving)");
}
