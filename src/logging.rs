//! Tracing subscriber setup for the `newsdesk` binary.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Log file name prefix inside the logs directory.
pub const LOG_FILE_PREFIX: &str = "newsdesk.log";

/// Build the filter: `RUST_LOG` wins, otherwise the configured directive.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter))
}

/// Install the global subscriber.
///
/// Logs go to stderr. With `config.file` set, a daily rolling file under
/// `logs_dir` is written as well; keep the returned guard alive until exit
/// so buffered lines are flushed.
pub fn init(config: &LoggingConfig, logs_dir: &Path) -> Option<WorkerGuard> {
    let (file_layer, guard) = if config.file {
        let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(writer);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let installed = tracing_subscriber::registry()
        .with(env_filter(config))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init();

    if let Err(err) = installed {
        eprintln!("logging already initialised: {err}");
    }
    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses() {
        let filter = EnvFilter::try_new(&LoggingConfig::default().filter);
        assert!(filter.is_ok());
    }
}
