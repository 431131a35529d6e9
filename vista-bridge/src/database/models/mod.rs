//! Database models for vista-bridge.
//!
//! These models map directly to the database schema.

pub mod processing;
pub mod settings;

pub use processing::*;
pub use settings::*;
