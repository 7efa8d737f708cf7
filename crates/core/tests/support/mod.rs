//! Shared test helpers for `prepdesk-core` integration tests.
//!
//! In-memory mocks for the three ports plus fixture builders, so tests can
//! focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod calendar;
pub mod fixtures;
pub mod messaging;
pub mod ticketing;
