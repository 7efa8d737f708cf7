//! Slack messaging adapter

pub mod client;

pub use client::SlackNotifier;
