//! Service layer module.
//!
//! The service container and the listing decorator consumed by the
//! browsing collaborator.

pub mod container;
pub mod decorator;

pub use container::ServiceContainer;
pub use decorator::{ListingDecorator, VideoDecoration};
