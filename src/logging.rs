//! Structured logging setup (console + optional rolling file).

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::BackofficeConfig;

const DEFAULT_FILTER: &str = "info,pos_backoffice=debug";
const LOG_FILE_PREFIX: &str = "backoffice";

/// Install the global subscriber.
///
/// Returns the file writer guard when `log_dir` is configured; dropping it
/// flushes and stops the background writer, so keep it alive for the lifetime
/// of the process. Calling this twice is harmless: the second install fails
/// silently and the first subscriber stays active.
pub fn init_logging(config: &BackofficeConfig) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let console_layer = fmt::layer().with_target(true);

    let Some(log_dir) = config.log_dir.as_ref() else {
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .try_init();
        return None;
    };

    if let Err(e) = std::fs::create_dir_all(log_dir) {
        eprintln!("cannot create log directory {}: {e}", log_dir.display());
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    tracing::info!(
        log_dir = %log_dir.display(),
        "Starting POS back-office client v{}",
        env!("CARGO_PKG_VERSION")
    );
    Some(guard)
}
