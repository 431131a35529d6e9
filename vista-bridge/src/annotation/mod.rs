//! Annotation platform integration.
//!
//! Session handling, task lookups with caching and duplicate detection.

pub mod cache;
pub mod client;
pub mod error;
pub mod service;
pub mod session;
pub mod types;

pub use error::AnnotationError;
pub use service::{AnnotationService, BATCH_CHUNK_SIZE};
pub use session::{AuthenticatedSession, SessionBinding, SessionManager};
pub use types::{AnnotationOccurrence, AnnotationStatus};
