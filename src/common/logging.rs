//! Logging and tracing configuration
//!
//! Two channels exist side by side. Scenario transcripts go through a
//! [`LogSink`] callback injected into the runner, one call per line.
//! Diagnostics go through `tracing`, initialized here for the CLI.

use std::sync::{Arc, Mutex};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Callback receiving one transcript line per call
pub type LogSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Initialize tracing for the CLI (stderr logging)
///
/// Logs are controlled by the `RUST_LOG` environment variable.
/// Default level is INFO for this crate, WARN for dependencies.
pub fn init_cli() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("scenario_assert=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// Sink that prints every transcript line to stdout
pub fn stdout_sink() -> LogSink {
    Arc::new(|line: &str| println!("{line}"))
}

/// Sink that records transcript lines in memory
///
/// Returns the sink together with the shared buffer it appends to.
pub fn recording_sink() -> (LogSink, Arc<Mutex<Vec<String>>>) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let buffer = Arc::clone(&lines);
    let sink: LogSink = Arc::new(move |line: &str| {
        if let Ok(mut lines) = buffer.lock() {
            lines.push(line.to_string());
        }
    });
    (sink, lines)
}
