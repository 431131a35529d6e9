//! Processing request and response types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ci::TriggerOutcome;
use crate::database::models::{ProcessingDbModel, ProcessingStatus, TriggerMethod};

/// Live processing state of one resource path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingInfo {
    pub job_name: String,
    pub status: ProcessingStatus,
    /// Unix epoch milliseconds
    pub started_at: i64,
}

impl From<&ProcessingDbModel> for ProcessingInfo {
    fn from(record: &ProcessingDbModel) -> Self {
        Self {
            job_name: record.job_name.clone(),
            status: record.status(),
            started_at: record.started_at,
        }
    }
}

/// Processing record as shown in the operator view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingRecordView {
    pub id: String,
    pub resource_path: String,
    pub job_name: String,
    pub trigger_method: String,
    pub queue_url: Option<String>,
    pub build_url: Option<String>,
    pub status: ProcessingStatus,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl From<ProcessingDbModel> for ProcessingRecordView {
    fn from(record: ProcessingDbModel) -> Self {
        let status = record.status();
        Self {
            started_at: crate::database::time::ms_to_datetime(record.started_at),
            id: record.id,
            resource_path: record.resource_path,
            job_name: record.job_name,
            trigger_method: record.trigger_method,
            queue_url: record.queue_url,
            build_url: record.build_url,
            status,
        }
    }
}

/// Request to hand a video off for annotation through the CI server.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendForAnnotationRequest {
    pub resource_path: String,
    pub method: TriggerMethod,
    pub project: String,
    pub org: String,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub padding: Option<u32>,
    #[serde(default)]
    pub assignee_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TriggerResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub job_name: String,
}

impl TriggerResponse {
    pub fn from_outcome(outcome: TriggerOutcome, job_name: impl Into<String>) -> Self {
        Self {
            success: outcome.success,
            queue_url: outcome.queue_url,
            build_url: outcome.build_url,
            error: outcome.error,
            job_name: job_name.into(),
        }
    }

    pub fn failed(error: impl Into<String>, job_name: impl Into<String>) -> Self {
        Self::from_outcome(TriggerOutcome::failed(error), job_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_minimal_body() {
        let request: SendForAnnotationRequest = serde_json::from_str(
            r#"{"resourcePath": "a/b.mp4", "method": "direct", "project": "P", "org": "O"}"#,
        )
        .unwrap();
        assert_eq!(request.method, TriggerMethod::Direct);
        assert!(request.model_name.is_none());
        assert!(request.confidence.is_none());
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        let result = serde_json::from_str::<SendForAnnotationRequest>(
            r#"{"resourcePath": "a.mp4", "method": "magic", "project": "P", "org": "O"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_processing_info_serializes_lowercase_status() {
        let info = ProcessingInfo {
            job_name: "job".to_string(),
            status: ProcessingStatus::Building,
            started_at: 1,
        };
        let json = serde_json::to_value(info).unwrap();
        assert_eq!(json["status"], "building");
        assert_eq!(json["jobName"], "job");
    }
}
