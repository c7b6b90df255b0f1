pub mod builders;
pub mod fake_backend;
pub mod scripts;

use std::sync::Once;
use tfstack::jobs::{JobDispatcher, JobId, JobRecord};
use tfstack::types::JobStatus;
use tracing_subscriber::{fmt, EnvFilter};

static TRACING: Once = Once::new();

/// Install a test subscriber once per test binary.
///
/// Output goes through the test writer, so it only shows up for failing tests
/// or with `--nocapture`. `RUST_LOG` overrides the default of debug for this
/// crate and warn for everything else.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,tfstack=debug"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Run a future with a 5-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}

/// Poll `id` until its status satisfies `done`, returning that snapshot.
pub async fn wait_for_status<F>(dispatcher: &dyn JobDispatcher, id: &JobId, done: F) -> JobRecord
where
    F: Fn(JobStatus) -> bool,
{
    with_timeout(async {
        loop {
            if let Some(record) = dispatcher.poll_status(id).await {
                if done(record.status()) {
                    return record;
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    })
    .await
}

/// Poll `id` until it is `Succeeded` or `Failed`.
pub async fn wait_for_terminal(dispatcher: &dyn JobDispatcher, id: &JobId) -> JobRecord {
    wait_for_status(dispatcher, id, JobStatus::is_terminal).await
}
