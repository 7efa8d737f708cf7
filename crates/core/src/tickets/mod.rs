//! Ticket views over the ticketing port
//!
//! `TicketQuery` composes search strings, `TicketSource` turns one agent into
//! the five per-agent views the performance snapshot is built from.

pub mod query;
pub mod source;
pub mod validation;

pub use query::{DateField, SortField, SortOrder, StatusFilter, TicketQuery};
pub use source::{CommentCounts, TicketSource};
pub use validation::normalize_email;
