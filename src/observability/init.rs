//! Tracing subscriber setup.

use super::file_writer::FileWriter;
use crate::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file name inside the data directory.
const LOG_FILE_NAME: &str = "bulkbar.log";

/// Installs the global subscriber: an `EnvFilter` and a plain-text `fmt`
/// layer writing to `<data dir>/bulkbar.log`.
///
/// # Initialization Behavior
///
/// - Creates the data directory if it doesn't exist
/// - Silently skips logging if the directory cannot be created
/// - Idempotent: only the first call takes effect
///
/// # Returns
///
/// The log file path when logging was set up by this call.
///
/// # Example
///
/// ```no_run
/// use bulkbar::observability::init_tracing;
/// use bulkbar::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) -> Option<PathBuf> {
    let level = config
        .trace_level
        .clone()
        .unwrap_or_else(|| "info".to_string());

    let data_dir = crate::infrastructure::data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return None;
    }

    let log_file = data_dir.join(LOG_FILE_NAME);
    let writer = Arc::new(FileWriter::new(log_file.clone()));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .ok()
        .map(|()| log_file)
}
