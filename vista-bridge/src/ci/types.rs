//! CI server types and wire mappings.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result reported for a build whose state cannot be read.
pub const UNKNOWN_RESULT: &str = "UNKNOWN";

/// CSRF crumb; sent as a header named by `field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrumbToken {
    pub field: String,
    pub value: String,
}

/// Outcome of a build trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TriggerOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_url: Option<String>,
    /// Omitted when the queue item did not start within the wait window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TriggerOutcome {
    pub fn queued(queue_url: Option<String>, build_url: Option<String>) -> Self {
        Self {
            success: true,
            queue_url,
            build_url,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            queue_url: None,
            build_url: None,
            error: Some(error.into()),
        }
    }
}

/// State of a queue item as seen by the poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueItemState {
    /// Still waiting for an executor.
    Waiting,
    /// Cancelled remotely (or CI is no longer configured).
    Cancelled,
    /// Left the queue; the build runs at `build_url`.
    Started { build_url: String },
    /// The queue item no longer exists. Either it became a build or it was purged.
    Gone,
    /// The call failed; nothing is known.
    Unknown,
}

/// Build progress. `finished` holds exactly when not building and a result is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStatus {
    pub building: bool,
    pub finished: bool,
    pub result: Option<String>,
}

impl BuildStatus {
    /// Treated as finished so records behind a broken endpoint are released.
    pub fn finished_unknown() -> Self {
        Self {
            building: false,
            finished: true,
            result: Some(UNKNOWN_RESULT.to_string()),
        }
    }

    /// Nothing is known; callers must leave state untouched.
    pub fn indeterminate() -> Self {
        Self {
            building: false,
            finished: false,
            result: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CrumbDto {
    pub crumb_request_field: String,
    pub crumb: String,
}

impl From<CrumbDto> for CrumbToken {
    fn from(dto: CrumbDto) -> Self {
        Self {
            field: dto.crumb_request_field,
            value: dto.crumb,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExecutableDto {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct QueueItemDto {
    #[serde(default)]
    pub cancelled: Option<bool>,
    #[serde(default)]
    pub executable: Option<ExecutableDto>,
}

impl From<QueueItemDto> for QueueItemState {
    fn from(dto: QueueItemDto) -> Self {
        if dto.cancelled == Some(true) {
            return Self::Cancelled;
        }
        match dto.executable.and_then(|e| e.url).filter(|url| !url.is_empty()) {
            Some(build_url) => Self::Started { build_url },
            None => Self::Waiting,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct BuildDto {
    #[serde(default)]
    pub building: Option<bool>,
    #[serde(default)]
    pub result: Option<String>,
}

impl From<BuildDto> for BuildStatus {
    fn from(dto: BuildDto) -> Self {
        let building = dto.building == Some(true);
        let finished = dto.building == Some(false) && dto.result.is_some();
        Self {
            building,
            finished,
            result: dto.result.filter(|r| !r.is_empty()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LastBuildDto {
    #[serde(default)]
    pub url: Option<String>,
}
