//! Zendesk ticketing adapter

pub mod client;
mod types;

pub use client::ZendeskClient;
