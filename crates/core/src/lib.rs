//! # PrepDesk Core
//!
//! Meeting detection and performance aggregation - no infrastructure
//! dependencies.
//!
//! This crate contains:
//! - Port interfaces for the calendar, ticketing and messaging services
//! - Ticket views and snapshot aggregation
//! - Meeting scanning, report rendering and the notification pass
//!
//! ## Architecture Principles
//! - Only depends on `prepdesk-domain`
//! - No HTTP or credential code
//! - All external services via traits

pub mod metrics;
pub mod orchestrator;
pub mod ports;
pub mod report;
pub mod scanner;
pub mod tickets;

pub use metrics::MetricsAggregator;
pub use orchestrator::{
    CheckOutcome, Collaborator, Collaborators, Orchestrator, OrchestratorSettings, PassReport,
    SelfTestReport,
};
pub use ports::{MeetingSource, NotificationSink, TicketingApi};
pub use report::{DiscussionPoint, ReportFormatter};
pub use scanner::{merge_windows, DetectedMeeting, ScanOutcome, ScanWindow, ScheduleScanner};
pub use tickets::{CommentCounts, TicketQuery, TicketSource};
