//! Persisted processing registry and the trigger flow that feeds it.

pub mod registry;
pub mod trigger;
pub mod types;

pub use registry::ProcessingRegistry;
pub use trigger::{TriggerService, build_parameters};
pub use types::{ProcessingInfo, ProcessingRecordView, SendForAnnotationRequest, TriggerResponse};
