//! Configuration management for the dashboard
//!
//! Settings are stored in section-scoped YAML-like files read and written
//! through [`crate::serializer::Session`].

pub mod app_settings;

// Re-export commonly used types
pub use app_settings::{AppSettings, WindowSettings};
