// tests/logging_level.rs

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tfstack::cli::LogLevel;
use tfstack::exec::{LineObserver, TracingObserver};
use tfstack::logging::resolve_directives;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn script_output_logged_at(directives: &str) -> String {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        TracingObserver::new("job-1/create").on_line("TF_VAR_db_password=hunter2");
    });

    let bytes = captured.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn cli_flag_wins_over_environment() {
    assert_eq!(resolve_directives(Some(LogLevel::Debug), Some("error")), "debug");
    assert_eq!(resolve_directives(Some(LogLevel::Trace), None), "trace");
}

#[test]
fn environment_directives_pass_through() {
    assert_eq!(resolve_directives(None, Some(" warn ")), "warn");
    assert_eq!(
        resolve_directives(None, Some("tfstack=debug,tower_http=warn")),
        "tfstack=debug,tower_http=warn"
    );
}

#[test]
fn defaults_to_info() {
    assert_eq!(resolve_directives(None, None), "info");
    assert_eq!(resolve_directives(None, Some("   ")), "info");
}

#[test]
fn resolved_directives_build_a_filter() {
    for level in [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ] {
        assert!(EnvFilter::try_new(resolve_directives(Some(level), None)).is_ok());
    }
}

#[test]
fn script_output_is_hidden_at_the_default_level() {
    assert_eq!(script_output_logged_at(&resolve_directives(None, None)), "");
}

#[test]
fn script_output_is_logged_at_debug_with_its_scope() {
    let logged = script_output_logged_at("debug");
    assert!(logged.contains("TF_VAR_db_password=hunter2"), "{logged}");
    assert!(logged.contains("job-1/create"), "{logged}");
}
