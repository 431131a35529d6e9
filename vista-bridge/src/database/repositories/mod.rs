//! Repository layer for database operations.

pub mod processing;
pub mod settings;

pub use processing::{ProcessingRepository, SqlxProcessingRepository};
pub use settings::{SettingsRepository, SqlxSettingsRepository};
