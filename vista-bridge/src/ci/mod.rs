//! CI server integration: build triggering and job status polling.

pub mod error;
pub mod gateway;
pub mod poller;
pub mod types;

pub use error::CiError;
pub use gateway::{BuildGateway, QueueWait};
pub use poller::{JobStatusPoller, JobStatusSource};
pub use types::{BuildStatus, QueueItemState, TriggerOutcome};
