//! Logging Infrastructure
//!
//! `tracing` subscriber setup: stdout by default, a daily rolling file when
//! the log directory exists, JSON lines on request.

use std::path::Path;

/// Initialize the logger at `info` on stdout
pub fn init_logger() {
    init_logger_with_file(None, false, None);
}

/// Initialize the logger with optional JSON format and file output
pub fn init_logger_with_file(log_level: Option<&str>, json: bool, log_dir: Option<&str>) {
    let level = log_level
        .and_then(|l| l.parse().ok())
        .unwrap_or(tracing::Level::INFO);

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let file_appender = log_dir
        .map(Path::new)
        .filter(|p| p.is_dir())
        .map(|p| tracing_appender::rolling::daily(p, "woo-station"));

    // try_init: tests may install a subscriber more than once
    let result = match (file_appender, json) {
        (Some(appender), true) => subscriber
            .json()
            .with_ansi(false)
            .with_writer(appender)
            .try_init(),
        (Some(appender), false) => subscriber.with_ansi(false).with_writer(appender).try_init(),
        (None, true) => subscriber.json().try_init(),
        (None, false) => subscriber.try_init(),
    };

    if let Err(e) = result {
        eprintln!("Logger already initialized: {}", e);
    }
}
