// ==========================================
// Logging initialisation
// ==========================================
// tracing + tracing-subscriber, level driven by RUST_LOG
// Logs go to stderr so stdout stays clean for JSON reports
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the human-readable subscriber.
///
/// # Environment
/// - RUST_LOG: filter directive (default: info)
///   e.g. `RUST_LOG=debug` or `RUST_LOG=offshore_logistics::engine=trace`
///
/// # Example
/// ```no_run
/// use offshore_logistics::logging;
/// logging::init();
/// ```
pub fn init() {
    fmt()
        .with_env_filter(env_filter("info"))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Install a JSON-lines subscriber, for log shipping.
pub fn init_json() {
    fmt()
        .json()
        .with_env_filter(env_filter("info"))
        .with_writer(std::io::stderr)
        .with_current_span(false)
        .init();
}

/// Test subscriber at debug level; repeated calls are ignored.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
