//! Logging setup with a reloadable filter.
//!
//! - Runtime log level changes via `tracing_subscriber::reload`
//! - Daily rolling log files with retention cleanup
//! - Local timezone timestamps

use chrono::{Local, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::Writer, time::FormatTime},
    layer::SubscriberExt,
    reload::{self, Handle},
    util::SubscriberInitExt,
};

use crate::utils::fs;

/// Default log filter directive.
pub const DEFAULT_LOG_FILTER: &str = "vista_bridge=info,sqlx=warn,tower_http=info";

/// Prefix of the rolling log files.
const LOG_FILE_PREFIX: &str = "vista-bridge.log";

/// Log retention period in days.
const LOG_RETENTION_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy)]
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

pub type FilterHandle = Handle<EnvFilter, tracing_subscriber::Registry>;

/// Handle to the installed subscriber. Keeps the file writer alive.
pub struct LoggingConfig {
    handle: FilterHandle,
    log_dir: PathBuf,
    _guard: WorkerGuard,
}

impl LoggingConfig {
    /// Current filter directive.
    pub fn get_filter(&self) -> String {
        self.handle
            .with_current(|filter| filter.to_string())
            .unwrap_or_default()
    }

    /// Replace the filter directive, e.g. `vista_bridge=debug,sqlx=warn`.
    pub fn set_filter(&self, directive: &str) -> crate::Result<()> {
        let new_filter = EnvFilter::try_new(directive)
            .map_err(|e| crate::Error::validation(format!("Invalid filter directive: {}", e)))?;

        self.handle
            .reload(new_filter)
            .map_err(|e| crate::Error::Other(format!("Failed to reload filter: {}", e)))?;

        info!(directive = %directive, "Log filter updated");
        Ok(())
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Delete log files older than the retention period once a day.
    pub fn start_retention_cleanup(self: &Arc<Self>, cancel_token: CancellationToken) {
        let log_dir = self.log_dir.clone();

        tokio::spawn(async move {
            let cleanup_interval = Duration::from_secs(24 * 60 * 60);

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        debug!("Log retention cleanup task shutting down");
                        break;
                    }
                    _ = tokio::time::sleep(cleanup_interval) => {
                        if let Err(e) = cleanup_old_logs(&log_dir, LOG_RETENTION_DAYS).await {
                            warn!(error = %e, "Failed to cleanup old logs");
                        }
                    }
                }
            }
        });
    }
}

/// Delete rolled log files (`vista-bridge.log.YYYY-MM-DD`) older than `retention_days`.
async fn cleanup_old_logs(log_dir: &Path, retention_days: i64) -> std::io::Result<usize> {
    let cutoff = (Utc::now() - chrono::Duration::days(retention_days)).date_naive();
    let dated_prefix = format!("{LOG_FILE_PREFIX}.");

    let mut entries = tokio::fs::read_dir(log_dir).await?;
    let mut deleted = 0;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(date_str) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix(dated_prefix.as_str()))
        else {
            continue;
        };

        let Ok(file_date) = chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d") else {
            continue;
        };

        if file_date < cutoff {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    deleted += 1;
                    debug!(path = %path.display(), "Deleted old log file");
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to delete old log file"),
            }
        }
    }

    if deleted > 0 {
        info!(count = deleted, "Cleaned up old log files");
    }

    Ok(deleted)
}

/// Install the global subscriber: console plus daily rolling file, both
/// behind one reloadable filter (`RUST_LOG` overrides the default).
pub fn init_logging(log_dir: impl AsRef<Path>) -> crate::Result<Arc<LoggingConfig>> {
    let log_path = log_dir.as_ref().to_path_buf();
    fs::ensure_dir_all_sync_with_op("creating log directory", &log_path)?;

    let file_appender = tracing_appender::rolling::daily(&log_path, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let initial_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let (filter_layer, filter_handle) = reload::Layer::new(initial_filter);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer().with_ansi(true).with_timer(LocalTimer))
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_timer(LocalTimer),
        )
        .try_init()
        .map_err(|e| {
            crate::Error::Other(format!("Failed to set global default subscriber: {}", e))
        })?;

    Ok(Arc::new(LoggingConfig {
        handle: filter_handle,
        log_dir: log_path,
        _guard: guard,
    }))
}

/// Log targets worth filtering on.
pub fn available_modules() -> Vec<(&'static str, &'static str)> {
    vec![
        ("vista_bridge", "Main application"),
        ("vista_bridge::annotation", "Annotation platform lookups"),
        ("vista_bridge::ci", "CI build triggering and polling"),
        ("vista_bridge::processing", "Processing registry"),
        ("sqlx", "Database queries"),
        ("reqwest", "HTTP requests"),
        ("tower_http", "HTTP middleware"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert!(DEFAULT_LOG_FILTER.contains("vista_bridge=info"));
        assert!(DEFAULT_LOG_FILTER.contains("sqlx=warn"));
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }

    #[test]
    fn test_available_modules() {
        let modules = available_modules();
        assert!(modules.iter().any(|(name, _)| *name == "vista_bridge"));
    }

    #[tokio::test]
    async fn test_cleanup_removes_only_old_dated_files() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("vista-bridge.log.2000-01-01");
        let today = dir
            .path()
            .join(format!("vista-bridge.log.{}", Utc::now().format("%Y-%m-%d")));
        let unrelated = dir.path().join("notes.txt");
        for path in [&old, &today, &unrelated] {
            std::fs::write(path, b"x").unwrap();
        }

        let deleted = cleanup_old_logs(dir.path(), LOG_RETENTION_DAYS).await.unwrap();

        assert_eq!(deleted, 1);
        assert!(!old.exists());
        assert!(today.exists());
        assert!(unrelated.exists());
    }
}
