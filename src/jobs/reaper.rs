// src/jobs/reaper.rs

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::store::JobStore;

/// Periodically evict finished jobs older than `ttl`.
///
/// Runs until the returned handle is aborted or the runtime shuts down.
pub fn spawn_reaper(store: JobStore, ttl: Duration, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(?ttl, ?interval, "job reaper started");

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let evicted = store.evict_expired(ttl).await;
            debug!(evicted, "job reaper pass finished");
        }
    })
}
