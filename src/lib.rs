#![forbid(unsafe_code)]
//! Settings core of the visual-novel reading dashboard
//!
//! - [`serializer`]: section-scoped read/modify/write of YAML-like settings files
//! - [`config`]: application settings built on top of it
//! - [`system`]: filesystem helpers

pub mod config;
pub mod constants;
pub mod serializer;
pub mod system;
