//! REST API consumed by the dashboard frontend.

pub mod error;
pub mod openapi;
pub mod routes;
pub mod server;

pub use server::{ApiServer, ApiServerConfig, AppState};
