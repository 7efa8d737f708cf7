//! Runtime configuration sourcing.
//!
//! Environment variables take precedence; a `prepdesk.{json,toml}` file is
//! the fallback when any required variable is missing.

pub mod loader;

pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
