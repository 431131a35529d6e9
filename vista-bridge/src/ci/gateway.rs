//! Build trigger gateway.
//!
//! Queues a parameterized build on the CI server and waits a bounded time
//! for the queue item to turn into a build.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::config::{CiCredentials, CredentialsProvider};
use crate::utils::url::{job_path, join};

use super::error::CiError;
use super::poller::JobStatusPoller;
use super::types::{CrumbDto, CrumbToken, QueueItemState, TriggerOutcome};

/// Bounds of the queue resolution wait after a build was queued.
#[derive(Debug, Clone, Copy)]
pub struct QueueWait {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for QueueWait {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            interval: Duration::from_secs(1),
        }
    }
}

pub struct BuildGateway {
    provider: Arc<dyn CredentialsProvider>,
    http: reqwest::Client,
    poller: Arc<JobStatusPoller>,
    wait: QueueWait,
}

impl BuildGateway {
    pub fn new(
        provider: Arc<dyn CredentialsProvider>,
        http: reqwest::Client,
        poller: Arc<JobStatusPoller>,
    ) -> Self {
        Self {
            provider,
            http,
            poller,
            wait: QueueWait::default(),
        }
    }

    pub fn with_queue_wait(mut self, wait: QueueWait) -> Self {
        self.wait = wait;
        self
    }

    pub async fn is_configured(&self) -> bool {
        self.provider.ci_credentials().await.is_some()
    }

    /// Trigger `job_name` with form-encoded `parameters`.
    ///
    /// Failures are reported in the outcome, never as an error. A missing
    /// `build_url` on success means the queue item did not start in time.
    #[instrument(skip_all, fields(job_name = %job_name))]
    pub async fn trigger_build(
        &self,
        job_name: &str,
        parameters: &BTreeMap<String, String>,
    ) -> TriggerOutcome {
        let Some(credentials) = self.provider.ci_credentials().await else {
            return TriggerOutcome::failed(CiError::NotConfigured.to_string());
        };

        match self.queue_build(&credentials, job_name, parameters).await {
            Ok(queue_url) => {
                let build_url = match queue_url.as_deref() {
                    Some(queue_url) => self.wait_for_build_url(&credentials, queue_url).await,
                    None => None,
                };
                match &build_url {
                    Some(url) => info!(build_url = %url, "Build started"),
                    None => warn!("Build URL not available yet, tracking via queue"),
                }
                TriggerOutcome::queued(queue_url, build_url)
            }
            Err(e) => {
                warn!(error = %e, "Failed to trigger build");
                TriggerOutcome::failed(e.to_string())
            }
        }
    }

    /// Fetch the CSRF crumb. `None` when the server does not issue one.
    async fn crumb(&self, credentials: &CiCredentials) -> Option<CrumbToken> {
        let result = self
            .http
            .get(join(&credentials.url, "crumbIssuer/api/json"))
            .basic_auth(&credentials.username, Some(&credentials.secret))
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Failed to get CSRF crumb");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(status = %response.status(), "No CSRF crumb issued");
            return None;
        }

        match response.json::<CrumbDto>().await {
            Ok(dto) => Some(dto.into()),
            Err(e) => {
                warn!(error = %e, "Invalid CSRF crumb response");
                None
            }
        }
    }

    /// POST the build request. Returns the queue URL from `Location`.
    async fn queue_build(
        &self,
        credentials: &CiCredentials,
        job_name: &str,
        parameters: &BTreeMap<String, String>,
    ) -> Result<Option<String>, CiError> {
        let crumb = self.crumb(credentials).await;

        let url = join(
            &credentials.url,
            &format!("{}/buildWithParameters", job_path(job_name)),
        );
        info!(?parameters, "Triggering build");

        let mut request = self
            .http
            .post(url)
            .basic_auth(&credentials.username, Some(&credentials.secret))
            .form(parameters);
        if let Some(crumb) = &crumb {
            request = request.header(crumb.field.as_str(), crumb.value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            return Err(CiError::rejected(status.as_u16(), &body));
        }

        let queue_url = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        info!(queue_url = ?queue_url, "Build queued");
        Ok(queue_url)
    }

    /// Poll the queue item until it starts, is cancelled, disappears or the wait expires.
    async fn wait_for_build_url(&self, credentials: &CiCredentials, queue_url: &str) -> Option<String> {
        let started = Instant::now();

        while started.elapsed() < self.wait.timeout {
            match self.poller.fetch_queue_item(credentials, queue_url).await {
                Ok(QueueItemState::Started { build_url }) => return Some(build_url),
                Ok(QueueItemState::Waiting) => tokio::time::sleep(self.wait.interval).await,
                Ok(state) => {
                    debug!(?state, "Queue item left the queue without a build URL");
                    return None;
                }
                Err(e) => {
                    warn!(queue_url, error = %e, "Error polling queue");
                    return None;
                }
            }
        }

        None
    }
}
