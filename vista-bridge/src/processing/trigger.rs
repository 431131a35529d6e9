//! Sending videos for annotation through the CI server.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::ci::BuildGateway;
use crate::config::JobCatalog;
use crate::database::models::TriggerMethod;
use crate::utils::filename::{file_name_of, parent_of};

use super::registry::ProcessingRegistry;
use super::types::{SendForAnnotationRequest, TriggerResponse};

const DEFAULT_MODEL_NAME: &str = "belt.pt";
const DEFAULT_CONFIDENCE: f64 = 0.5;
const DEFAULT_PADDING: u32 = 30;

/// Select the job for `request.method` and build its parameters.
pub fn build_parameters(
    request: &SendForAnnotationRequest,
    jobs: &JobCatalog,
) -> (String, BTreeMap<String, String>) {
    let mut params = BTreeMap::new();

    let job_name = match request.method {
        TriggerMethod::Roi => {
            params.insert("VIDEO_PATH".to_string(), request.resource_path.clone());
            let model_name = request
                .model_name
                .as_deref()
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_MODEL_NAME);
            params.insert("MODEL_NAME".to_string(), model_name.to_string());
            params.insert(
                "CONFIDENCE".to_string(),
                request.confidence.unwrap_or(DEFAULT_CONFIDENCE).to_string(),
            );
            params.insert(
                "PADDING".to_string(),
                request.padding.unwrap_or(DEFAULT_PADDING).to_string(),
            );
            jobs.roi_job.clone()
        }
        TriggerMethod::Direct => {
            params.insert(
                "VIDEO_PATH".to_string(),
                parent_of(&request.resource_path).to_string(),
            );
            params.insert(
                "SPECIFIC_VIDEO".to_string(),
                file_name_of(&request.resource_path).to_string(),
            );
            jobs.direct_job.clone()
        }
    };

    params.insert("CVAT_PROJECT".to_string(), request.project.clone());
    params.insert("CVAT_ORG".to_string(), request.org.clone());
    if let Some(assignee) = request.assignee_id.as_deref().filter(|a| !a.is_empty()) {
        params.insert("ASSIGNEE_ID".to_string(), assignee.to_string());
    }

    (job_name, params)
}

pub struct TriggerService {
    gateway: Arc<BuildGateway>,
    registry: Arc<ProcessingRegistry>,
    jobs: JobCatalog,
}

impl TriggerService {
    pub fn new(gateway: Arc<BuildGateway>, registry: Arc<ProcessingRegistry>, jobs: JobCatalog) -> Self {
        Self {
            gateway,
            registry,
            jobs,
        }
    }

    /// Trigger the annotation job for one video and start tracking it.
    #[instrument(skip_all, fields(resource_path = %request.resource_path, method = %request.method))]
    pub async fn send_for_annotation(&self, request: &SendForAnnotationRequest) -> TriggerResponse {
        let (job_name, parameters) = build_parameters(request, &self.jobs);

        if request.resource_path.trim().is_empty() {
            return TriggerResponse::failed("resourcePath is required", job_name);
        }

        if !self.gateway.is_configured().await {
            return TriggerResponse::failed("CI server not configured", job_name);
        }

        info!(job_name = %job_name, "Sending video for annotation");
        let outcome = self.gateway.trigger_build(&job_name, &parameters).await;

        if outcome.success
            && let Err(e) = self
                .registry
                .start_processing(
                    &request.resource_path,
                    &job_name,
                    request.method,
                    outcome.queue_url.clone(),
                )
                .await
        {
            warn!(error = %e, "Build queued but processing record could not be stored");
        }

        TriggerResponse::from_outcome(outcome, job_name)
    }
}
