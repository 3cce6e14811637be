//! Structured logging setup (console + optional rolling file).

use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{ApiError, ApiResult};

/// Daily log files are named `dashboard.<date>`.
const LOG_FILE_PREFIX: &str = "dashboard";
const MAX_LOG_FILES: usize = 14;
const DEFAULT_FILTER: &str = "info,restro_dashboard_lib=debug";

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub log_dir: Option<PathBuf>,
    pub json: bool,
}

/// Install the global subscriber. Console output goes to stderr so command
/// output on stdout stays clean. The returned guard must be held until exit;
/// dropping it flushes the file writer.
pub fn init(options: &LogOptions) -> ApiResult<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console_plain = (!options.json).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
    });
    let console_json = options
        .json
        .then(|| fmt::layer().json().with_writer(std::io::stderr));

    let (file_layer, guard) = match options.log_dir.as_deref() {
        Some(dir) => {
            fs::create_dir_all(dir)
                .map_err(|e| ApiError::Config(format!("create log dir {}: {e}", dir.display())))?;
            prune_old_logs(dir, MAX_LOG_FILES);
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_plain)
        .with(console_json)
        .with(file_layer)
        .try_init()
        .map_err(|e| ApiError::Config(format!("logging already initialised: {e}")))?;

    Ok(guard)
}

/// Keep only the `keep` most recently modified dashboard log files in `dir`.
pub fn prune_old_logs(dir: &Path, keep: usize) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    let mut log_files: Vec<(PathBuf, std::time::SystemTime)> = entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            let name = path.file_name()?.to_str()?;
            if !path.is_file() || !name.starts_with(LOG_FILE_PREFIX) {
                return None;
            }
            let modified = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .unwrap_or(std::time::UNIX_EPOCH);
            Some((path, modified))
        })
        .collect();

    // Newest first
    log_files.sort_by(|a, b| b.1.cmp(&a.1));

    for (path, _) in log_files.iter().skip(keep) {
        if let Err(e) = fs::remove_file(path) {
            warn!("Failed to prune log file {}: {e}", path.display());
        }
    }
}
