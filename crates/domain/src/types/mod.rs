//! Domain types and models

pub mod meeting;
pub mod snapshot;
pub mod ticket;

pub use meeting::{resolve_agent_email, Attendee, Meeting};
pub use snapshot::{PerformanceSnapshot, SnapshotSummary};
pub use ticket::{
    Agent, Comment, CommentVisibility, CsatPolarity, CsatTicket, SatisfactionRating,
    SatisfactionScore, SlaBreach, SlaPolicy, SlaPolicyMetric, Ticket, TicketPriority,
    TicketStatus,
};
