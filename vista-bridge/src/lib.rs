//! vista-bridge library crate.
//!
//! Annotation platform lookups, CI build triggering and the processing
//! registry behind the video dashboard.

pub mod annotation;
pub mod api;
pub mod ci;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod processing;
pub mod services;
pub mod utils;

pub use error::{Error, Result};
