//! Tracing bootstrap for the console shell.
//!
//! Console output is always on; a daily-rolling log file can be mirrored in
//! via [`LogSettings`]. `RUST_LOG` overrides the configured level.

use crate::domain::settings::LogSettings;
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Keeps the file writer flushing; hold it for the process lifetime.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

pub fn init_logger(settings: &LogSettings) -> anyhow::Result<LoggingGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::from_str(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false);

    let (file_layer, file_guard) = if settings.log_to_file {
        let appender = tracing_appender::rolling::daily(&settings.log_dir, "zumolink");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        // No ANSI escapes in the file copy
        let layer = fmt::layer().with_writer(writer).with_ansi(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();

    tracing::info!("Logging initialized");

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}
