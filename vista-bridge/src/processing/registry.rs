//! Processing registry.
//!
//! Persists one live CI job per resource path and reconciles it against
//! the CI server whenever it is read:
//!
//! ```text
//!   (none)   --start_processing-->        queued
//!   queued   --queue item cancelled-->    (deleted)
//!   queued   --queue item became build--> building
//!   building --build finished-->          (deleted)
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::ci::{JobStatusSource, QueueItemState};
use crate::database::models::{ProcessingDbModel, ProcessingStatus, TriggerMethod};
use crate::database::repositories::ProcessingRepository;
use crate::{Error, Result};

use super::types::ProcessingInfo;

pub struct ProcessingRegistry {
    repo: Arc<dyn ProcessingRepository>,
    source: Arc<dyn JobStatusSource>,
}

impl ProcessingRegistry {
    pub fn new(repo: Arc<dyn ProcessingRepository>, source: Arc<dyn JobStatusSource>) -> Self {
        Self { repo, source }
    }

    /// Start tracking a job for `path`, replacing any record already there.
    pub async fn start_processing(
        &self,
        path: &str,
        job_name: &str,
        method: TriggerMethod,
        queue_url: Option<String>,
    ) -> Result<ProcessingDbModel> {
        let record = ProcessingDbModel::new(path, job_name, method, queue_url);
        let stored = self.repo.upsert_by_path(&record).await?;
        info!(resource_path = %path, job_name, "Started tracking processing");
        Ok(stored)
    }

    /// Reconcile the records for `paths`, then return the ones still in flight.
    #[instrument(skip_all, fields(paths = paths.len()))]
    pub async fn get_for_paths_and_refresh(
        &self,
        paths: &[String],
    ) -> Result<HashMap<String, ProcessingInfo>> {
        if paths.is_empty() {
            return Ok(HashMap::new());
        }

        let records = self.repo.find_by_paths(paths).await?;
        if records.is_empty() {
            return Ok(HashMap::new());
        }

        self.reconcile(records).await?;

        let live = self
            .repo
            .find_by_paths_and_statuses(paths, &ProcessingStatus::ACTIVE)
            .await?;
        Ok(live
            .iter()
            .map(|record| (record.resource_path.clone(), ProcessingInfo::from(record)))
            .collect())
    }

    /// All queued or building records, most recent first. No reconciliation.
    pub async fn get_all_active(&self) -> Result<Vec<ProcessingDbModel>> {
        self.repo
            .find_by_statuses_ordered(&ProcessingStatus::ACTIVE)
            .await
    }

    /// Delete a record regardless of its state.
    pub async fn remove(&self, id: &str) -> Result<()> {
        if !self.repo.delete(id).await? {
            return Err(Error::not_found("ProcessingRecord", id));
        }
        info!(id, "Manually removed processing record");
        Ok(())
    }

    async fn reconcile(&self, records: Vec<ProcessingDbModel>) -> Result<()> {
        for record in records {
            if record.status().is_terminal() {
                self.repo.delete(&record.id).await?;
                continue;
            }

            if let Err(e) = self.reconcile_record(&record).await {
                warn!(resource_path = %record.resource_path, error = %e, "Failed to refresh processing status");
            }
        }
        Ok(())
    }

    async fn reconcile_record(&self, record: &ProcessingDbModel) -> Result<()> {
        let mut status = record.status();
        let mut build_url = record.build_url.clone();

        if status == ProcessingStatus::Queued
            && let Some(queue_url) = record.queue_url.as_deref()
        {
            let started = match self.source.get_queue_item(queue_url).await {
                QueueItemState::Cancelled => {
                    self.repo.delete(&record.id).await?;
                    info!(resource_path = %record.resource_path, "Job cancelled");
                    return Ok(());
                }
                QueueItemState::Started { build_url } => Some(build_url),
                QueueItemState::Gone => {
                    debug!(
                        resource_path = %record.resource_path,
                        job_name = %record.job_name,
                        "Queue item gone, falling back to the job's last build"
                    );
                    self.source.last_build_url(&record.job_name).await
                }
                QueueItemState::Waiting | QueueItemState::Unknown => None,
            };

            if let Some(url) = started {
                self.repo.mark_building(&record.id, &url).await?;
                info!(resource_path = %record.resource_path, build_url = %url, "Job started building");
                status = ProcessingStatus::Building;
                build_url = Some(url);
            }
        }

        if status == ProcessingStatus::Building
            && let Some(url) = build_url.as_deref()
        {
            let build = self.source.get_build_status(url).await;
            if build.finished {
                self.repo.delete(&record.id).await?;
                info!(
                    resource_path = %record.resource_path,
                    result = build.result.as_deref().unwrap_or("UNKNOWN"),
                    "Build finished"
                );
            }
        }

        Ok(())
    }
}
