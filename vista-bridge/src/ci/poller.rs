//! CI job status queries.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::config::{CiCredentials, CredentialsProvider};
use crate::utils::url::{api_json_url, job_path, join};

use super::error::CiError;
use super::types::{BuildDto, BuildStatus, LastBuildDto, QueueItemDto, QueueItemState};

/// Read-only view of remote job state, consumed by the processing registry.
///
/// Implementations never fail: errors map to the least committal answer.
#[async_trait]
pub trait JobStatusSource: Send + Sync {
    async fn get_queue_item(&self, queue_url: &str) -> QueueItemState;

    async fn get_build_status(&self, build_url: &str) -> BuildStatus;

    /// URL of the most recent build of a job, if any.
    async fn last_build_url(&self, job_name: &str) -> Option<String>;
}

pub struct JobStatusPoller {
    provider: Arc<dyn CredentialsProvider>,
    http: reqwest::Client,
}

impl JobStatusPoller {
    pub fn new(provider: Arc<dyn CredentialsProvider>, http: reqwest::Client) -> Self {
        Self { provider, http }
    }

    /// Query a queue item. A non-success status means the item is gone.
    pub(crate) async fn fetch_queue_item(
        &self,
        credentials: &CiCredentials,
        queue_url: &str,
    ) -> Result<QueueItemState, CiError> {
        let response = self
            .http
            .get(api_json_url(queue_url))
            .basic_auth(&credentials.username, Some(&credentials.secret))
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(QueueItemState::Gone);
        }

        let item: QueueItemDto = response
            .json()
            .await
            .map_err(|e| CiError::Parse(e.to_string()))?;
        Ok(item.into())
    }

    async fn fetch_build_status(
        &self,
        credentials: &CiCredentials,
        build_url: &str,
    ) -> Result<BuildStatus, CiError> {
        let response = self
            .http
            .get(api_json_url(build_url))
            .basic_auth(&credentials.username, Some(&credentials.secret))
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(BuildStatus::finished_unknown());
        }

        let build: BuildDto = response
            .json()
            .await
            .map_err(|e| CiError::Parse(e.to_string()))?;
        Ok(build.into())
    }

    async fn fetch_last_build_url(
        &self,
        credentials: &CiCredentials,
        job_name: &str,
    ) -> Result<Option<String>, CiError> {
        let url = join(
            &credentials.url,
            &format!("{}/lastBuild/api/json", job_path(job_name)),
        );
        let response = self
            .http
            .get(url)
            .basic_auth(&credentials.username, Some(&credentials.secret))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(job_name, %status, "No last build available");
            return Ok(None);
        }

        let build: LastBuildDto = response
            .json()
            .await
            .map_err(|e| CiError::Parse(e.to_string()))?;
        Ok(build.url.filter(|url| !url.is_empty()))
    }
}

#[async_trait]
impl JobStatusSource for JobStatusPoller {
    async fn get_queue_item(&self, queue_url: &str) -> QueueItemState {
        let Some(credentials) = self.provider.ci_credentials().await else {
            return QueueItemState::Cancelled;
        };

        match self.fetch_queue_item(&credentials, queue_url).await {
            Ok(state) => state,
            Err(e) => {
                warn!(queue_url, error = %e, "Failed to get queue item");
                QueueItemState::Unknown
            }
        }
    }

    async fn get_build_status(&self, build_url: &str) -> BuildStatus {
        let Some(credentials) = self.provider.ci_credentials().await else {
            return BuildStatus::finished_unknown();
        };

        match self.fetch_build_status(&credentials, build_url).await {
            Ok(status) => status,
            Err(e) => {
                warn!(build_url, error = %e, "Failed to get build status");
                BuildStatus::indeterminate()
            }
        }
    }

    async fn last_build_url(&self, job_name: &str) -> Option<String> {
        let credentials = self.provider.ci_credentials().await?;

        match self.fetch_last_build_url(&credentials, job_name).await {
            Ok(url) => url,
            Err(e) => {
                warn!(job_name, error = %e, "Failed to get last build");
                None
            }
        }
    }
}
