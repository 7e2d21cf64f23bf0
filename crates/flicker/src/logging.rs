//! Stdout plus daily-rolling file logging.

use crate::config::project_dirs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "flicker=debug,flicker_core=debug";
const LOG_FILE_PREFIX: &str = "flicker.log";

/// Keeps the file writer flushing. Hold it until the process exits.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the default filter. When the data directory is
/// unavailable only stdout logging is installed.
pub fn init() -> LoggingGuard {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stdout_layer = fmt::layer().with_target(true).compact();

    let file = project_dirs().ok().map(|dirs| {
        let appender =
            tracing_appender::rolling::daily(dirs.data_dir().join("logs"), LOG_FILE_PREFIX);
        tracing_appender::non_blocking(appender)
    });

    match file {
        Some((writer, guard)) => {
            let file_layer = fmt::layer().json().with_writer(writer).with_target(true);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stdout_layer)
                .with(file_layer)
                .init();
            LoggingGuard {
                _file_guard: Some(guard),
            }
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stdout_layer)
                .init();
            LoggingGuard { _file_guard: None }
        }
    }
}
