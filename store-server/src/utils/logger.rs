//! Logging Infrastructure
//!
//! `RUST_LOG` wins over the configured level when it is set.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger with optional JSON output and daily rolling files
///
/// File output is used only when `log_dir` exists or can be created.
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let file_dir = log_dir.filter(|dir| {
        let path = Path::new(dir);
        path.exists() || std::fs::create_dir_all(path).is_ok()
    });

    // try_init: a second call (tests) keeps the first subscriber
    match (file_dir, json.unwrap_or(false)) {
        (Some(dir), true) => {
            let appender = tracing_appender::rolling::daily(dir, "store-server");
            let _ = subscriber.json().with_writer(appender).try_init();
        }
        (Some(dir), false) => {
            let appender = tracing_appender::rolling::daily(dir, "store-server");
            let _ = subscriber.with_ansi(false).with_writer(appender).try_init();
        }
        (None, true) => {
            let _ = subscriber.json().try_init();
        }
        (None, false) => {
            let _ = subscriber.try_init();
        }
    }
}
