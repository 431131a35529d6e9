//! Annotation task resolver.
//!
//! Answers "does this video already have an annotation task" for the
//! listing decorator. Lookups never fail outward: remote errors are logged
//! and reported as not found.

use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::config::{AnnotationCredentials, CredentialsProvider};
use crate::utils::filename::task_name_from_filename;
use crate::utils::url::join;

use super::cache::{ProjectNameCache, TaskLookupCache};
use super::client::{AnnotationClient, TaskDto};
use super::error::AnnotationError;
use super::session::{AuthenticatedSession, SessionManager};
use super::types::{AnnotationOccurrence, AnnotationStatus, NO_PROJECT, placeholder_project_name};

/// Lookups resolved concurrently per batch chunk.
pub const BATCH_CHUNK_SIZE: usize = 10;

pub struct AnnotationService {
    provider: Arc<dyn CredentialsProvider>,
    sessions: SessionManager,
    client: AnnotationClient,
    tasks: TaskLookupCache,
    projects: ProjectNameCache,
}

impl AnnotationService {
    pub fn new(provider: Arc<dyn CredentialsProvider>, http: reqwest::Client) -> Self {
        let client = AnnotationClient::new(http);
        Self {
            sessions: SessionManager::new(provider.clone(), client.clone()),
            provider,
            client,
            tasks: TaskLookupCache::new(),
            projects: ProjectNameCache::new(),
        }
    }

    pub fn with_session_lifetime(mut self, lifetime: Duration) -> Self {
        self.sessions = self.sessions.with_lifetime(lifetime);
        self
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Task names with a refresh in flight.
    pub fn pending_refreshes(&self) -> usize {
        self.tasks.refresh_lock_count()
    }

    pub async fn is_configured(&self) -> bool {
        self.provider.annotation_credentials().await.is_some()
    }

    /// Look up all tasks named exactly `name`.
    #[instrument(skip_all, fields(task_name = %name))]
    pub async fn find_task_by_name(&self, name: &str) -> AnnotationStatus {
        let Some(credentials) = self.provider.annotation_credentials().await else {
            return AnnotationStatus::not_found();
        };

        let url = credentials.url.as_str();
        if let Some(status) = self.tasks.get(url, name) {
            return status;
        }

        let lock = self.tasks.refresh_lock(url, name);
        let status = {
            let _guard = lock.lock().await;
            // Another caller may have refreshed while we waited.
            match self.tasks.get(url, name) {
                Some(status) => status,
                None => self.refresh(name, &credentials).await,
            }
        };
        self.tasks.release_refresh_lock(url, name, lock);
        status
    }

    async fn refresh(&self, name: &str, credentials: &AnnotationCredentials) -> AnnotationStatus {
        match self.resolve(name).await {
            Ok((url, status)) => {
                debug!(
                    exists = status.exists,
                    occurrences = status.occurrences.len(),
                    "Task lookup refreshed"
                );
                self.tasks.insert(
                    &url,
                    name,
                    status.clone(),
                    Duration::from_millis(credentials.cache_ttl_ms),
                );
                status
            }
            Err(e) => {
                warn!(error = %e, "Annotation task lookup failed, reporting not found");
                AnnotationStatus::not_found()
            }
        }
    }

    /// Look up the task for a video file; task names are file names without extension.
    pub async fn check_video_status(&self, filename: &str) -> AnnotationStatus {
        self.find_task_by_name(task_name_from_filename(filename)).await
    }

    /// Look up many files, at most [`BATCH_CHUNK_SIZE`] at a time.
    pub async fn check_videos_status(&self, filenames: &[String]) -> HashMap<String, AnnotationStatus> {
        if !self.is_configured().await {
            return filenames
                .iter()
                .map(|filename| (filename.clone(), AnnotationStatus::not_found()))
                .collect();
        }

        let mut results = HashMap::with_capacity(filenames.len());
        for chunk in filenames.chunks(BATCH_CHUNK_SIZE) {
            let statuses = join_all(chunk.iter().map(|f| self.check_video_status(f))).await;
            results.extend(chunk.iter().cloned().zip(statuses));
        }
        results
    }

    /// Resolve `name` against the server the session is bound to; returns that server's URL.
    async fn resolve(&self, name: &str) -> Result<(String, AnnotationStatus), AnnotationError> {
        let session = self.sessions.ensure_authenticated().await?;
        let url = session.credentials.url.clone();
        let tasks = self.client.search_tasks(&session, name).await?;

        let exact: Vec<TaskDto> = tasks.into_iter().filter(|t| t.name == name).collect();
        if exact.is_empty() {
            return Ok((url, AnnotationStatus::not_found()));
        }

        let occurrences = join_all(exact.iter().map(|task| self.enrich(&session, task))).await;
        Ok((url, AnnotationStatus::from_occurrences(occurrences)))
    }

    async fn enrich(&self, session: &AuthenticatedSession, task: &TaskDto) -> AnnotationOccurrence {
        let project_name = async {
            match task.project_id {
                Some(project_id) => self.project_name(session, project_id).await,
                None => NO_PROJECT.to_string(),
            }
        };
        let (project_name, stage) = tokio::join!(project_name, self.task_stage(session, task.id));

        AnnotationOccurrence {
            task_id: task.id,
            task_url: join(&session.credentials.url, &format!("tasks/{}", task.id)),
            project_id: task.project_id,
            project_name,
            stage,
        }
    }

    async fn project_name(&self, session: &AuthenticatedSession, project_id: i64) -> String {
        if let Some(name) = self.projects.get(&session.credentials.url, project_id) {
            return name;
        }

        match self.client.project_name(session, project_id).await {
            Ok(name) => {
                self.projects.insert(&session.credentials.url, project_id, name.clone());
                name
            }
            Err(e) => {
                warn!(project_id, error = %e, "Failed to resolve project name");
                placeholder_project_name(project_id)
            }
        }
    }

    async fn task_stage(&self, session: &AuthenticatedSession, task_id: i64) -> Option<String> {
        match self.client.first_job_stage(session, task_id).await {
            Ok(stage) => stage,
            Err(e) => {
                warn!(task_id, error = %e, "Failed to resolve task stage");
                None
            }
        }
    }
}
