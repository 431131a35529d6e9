//! Processing record database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::time::now_ms;

/// Processing record database model.
/// One live CI job per resource path.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ProcessingDbModel {
    pub id: String,
    /// Resource path relative to the video root (unique)
    pub resource_path: String,
    /// Remote CI job identifier, may contain `/` for nested folders
    pub job_name: String,
    /// Trigger method: roi, direct
    pub trigger_method: String,
    /// Queue item URL returned by the CI server
    pub queue_url: Option<String>,
    /// Build URL once the queue item has been assigned an executor
    pub build_url: Option<String>,
    /// Status: queued, building, success, failed
    pub status: String,
    /// Unix epoch milliseconds when processing was (re)started
    pub started_at: i64,
}

impl ProcessingDbModel {
    pub fn new(
        resource_path: impl Into<String>,
        job_name: impl Into<String>,
        method: TriggerMethod,
        queue_url: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            resource_path: resource_path.into(),
            job_name: job_name.into(),
            trigger_method: method.as_str().to_string(),
            queue_url,
            build_url: None,
            status: ProcessingStatus::Queued.as_str().to_string(),
            started_at: now_ms(),
        }
    }

    /// Parsed status. Unknown values are treated as terminal so they get pruned.
    pub fn status(&self) -> ProcessingStatus {
        ProcessingStatus::parse(&self.status).unwrap_or(ProcessingStatus::Failed)
    }
}

/// Lifecycle of a processing record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    utoipa::ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    /// Build request accepted, waiting in the CI queue.
    Queued,
    /// Queue item resolved to a running build.
    Building,
    Success,
    Failed,
}

impl ProcessingStatus {
    /// Statuses that count as in flight.
    pub const ACTIVE: [ProcessingStatus; 2] = [Self::Queued, Self::Building];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Building => "building",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(Self::Queued),
            "building" => Some(Self::Building),
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

/// How the annotation job was requested.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    utoipa::ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TriggerMethod {
    /// Region-of-interest extraction before upload.
    Roi,
    /// Upload the video as-is.
    Direct,
}

impl TriggerMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Roi => "roi",
            Self::Direct => "direct",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "roi" => Some(Self::Roi),
            "direct" => Some(Self::Direct),
            _ => None,
        }
    }
}
