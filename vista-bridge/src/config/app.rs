//! Process-level configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "sqlite:vista.db?mode=rwc";
const DEFAULT_LOG_DIR: &str = "./logs";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default CI job running ROI extraction before upload.
pub const DEFAULT_ROI_JOB: &str = "pt-models/yolo_roi_extractor";
/// Default CI job uploading a video unchanged.
pub const DEFAULT_DIRECT_JOB: &str = "pt-models/cvat-video-uploader";

/// The two fixed remote job identifiers selected by trigger method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCatalog {
    pub roi_job: String,
    pub direct_job: String,
}

impl Default for JobCatalog {
    fn default() -> Self {
        Self {
            roi_job: DEFAULT_ROI_JOB.to_string(),
            direct_job: DEFAULT_DIRECT_JOB.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub log_dir: PathBuf,
    pub http_timeout: Duration,
    pub jobs: JobCatalog,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            jobs: JobCatalog::default(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AppConfig {
    pub fn from_env_or_default() -> Self {
        let mut config = Self::default();

        if let Some(url) = non_empty_var("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(dir) = non_empty_var("LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(secs) = non_empty_var("HTTP_TIMEOUT_SECS")
            && let Ok(parsed) = secs.parse::<u64>()
        {
            config.http_timeout = Duration::from_secs(parsed);
        }
        if let Some(job) = non_empty_var("CI_ROI_JOB") {
            config.jobs.roi_job = job;
        }
        if let Some(job) = non_empty_var("CI_DIRECT_JOB") {
            config.jobs.direct_job = job;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.database_url, "sqlite:vista.db?mode=rwc");
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.jobs.roi_job, "pt-models/yolo_roi_extractor");
        assert_eq!(config.jobs.direct_job, "pt-models/cvat-video-uploader");
    }
}
