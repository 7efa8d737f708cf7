//! # PrepDesk Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP client with timeouts and bounded retries
//! - Configuration loading (environment, then `prepdesk.{json,toml}`)
//! - External service integrations (Zendesk, Google Calendar, Slack)
//!
//! ## Architecture
//! - Implements traits defined in `prepdesk-core`
//! - Contains all "impure" code (network and file I/O)

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::*;
