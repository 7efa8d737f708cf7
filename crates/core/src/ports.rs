//! Port interfaces for the external collaborators
//!
//! These traits define the boundaries between the briefing logic and the
//! infrastructure adapters (ticketing, calendar, messaging).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use prepdesk_domain::{Agent, Comment, Meeting, Result, SatisfactionRating, SlaPolicy, Ticket};

use crate::tickets::TicketQuery;

/// Read-only access to the ticketing system.
///
/// Every call is a single authenticated request. Implementations report
/// transport failures as errors; callers decide how to degrade.
#[async_trait]
pub trait TicketingApi: Send + Sync {
    /// Look up a user by (already normalized) email address.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<Agent>>;

    /// Run a ticket search.
    async fn search_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>>;

    /// All comments of a ticket.
    async fn ticket_comments(&self, ticket_id: u64) -> Result<Vec<Comment>>;

    /// Satisfaction rating of a ticket, if one was left.
    async fn satisfaction_rating(&self, ticket_id: u64) -> Result<Option<SatisfactionRating>>;

    /// SLA policies applied to a ticket, in provider order.
    async fn sla_policies(&self, ticket_id: u64) -> Result<Vec<SlaPolicy>>;

    /// Verify credentials and reachability.
    async fn check_connection(&self) -> Result<()>;
}

/// Calendar lookup.
#[async_trait]
pub trait MeetingSource: Send + Sync {
    /// Meetings starting between `time_min` and `time_max`.
    ///
    /// Boundary inclusiveness is provider defined and `keyword_hint` is only
    /// a hint; callers re-check both.
    async fn list_meetings(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        keyword_hint: &str,
    ) -> Result<Vec<Meeting>>;
}

/// Chat delivery.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Post `text` to `channel_id`.
    async fn post_message(&self, channel_id: &str, text: &str) -> Result<()>;
}
