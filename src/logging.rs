//! Diagnostics setup for hosts that do not install their own subscriber.
//!
//! Configure via the `RUST_LOG` environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=multicaret::replicate=trace` - module-level filtering

use std::path::Path;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install a console subscriber filtered by `RUST_LOG` (default `warn`).
/// No-op when a global subscriber is already set.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_filter(filter))
        .try_init();
}

/// Console subscriber plus a daily-rotated debug log under `logs_dir`.
pub fn init_with_file(logs_dir: &Path) {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let console_layer = fmt::layer().with_target(true).with_filter(console_filter);

    let file_appender = tracing_appender::rolling::daily(logs_dir, "multicaret.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_filter(EnvFilter::new("debug"));

    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}
