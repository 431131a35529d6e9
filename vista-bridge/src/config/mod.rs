//! Configuration module.
//!
//! Process settings come from the environment; remote credentials live in
//! the database and are served through [`CredentialsProvider`].

pub mod app;
pub mod service;
pub mod types;

pub use app::{AppConfig, JobCatalog};
pub use service::{ConfigService, CredentialsProvider};
pub use types::{AnnotationCredentials, CiCredentials, SettingsPatch, SettingsView};
