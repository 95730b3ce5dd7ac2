use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_FILE_PREFIX: &str = "chatterm.log";

const DEFAULT_FILTER: &str = "chatterm_tui=info,chatterm_core=info";

/// Sends all tracing output to a daily rolling file under `log_dir`.
///
/// The terminal is in raw mode while chatterm runs, so nothing is written to
/// stdout or stderr. Keep the returned guard alive until exit or buffered
/// lines are lost.
pub fn init_logging(log_dir: &Path) -> color_eyre::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_target(true)
        .with_level(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
