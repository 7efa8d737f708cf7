//! Shared HTTP plumbing for the external service adapters.

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
