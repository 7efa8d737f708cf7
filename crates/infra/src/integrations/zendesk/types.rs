//! Zendesk response payloads
//!
//! Private wire shapes that are reduced to domain types before they leave the
//! adapter. Tickets and SLA policies deserialize straight into the domain
//! structs.

use prepdesk_domain::{
    Agent, Comment, CommentVisibility, SatisfactionRating, SatisfactionScore, SlaPolicy, Ticket,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct UsersResponse {
    #[serde(default)]
    pub users: Vec<ZendeskUser>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CurrentUserResponse {
    pub user: ZendeskUser,
}

#[derive(Debug, Deserialize)]
pub(super) struct ZendeskUser {
    /// Absent for the anonymous user returned to unauthenticated callers.
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ZendeskUser {
    pub fn into_agent(self, fallback_email: &str) -> Option<Agent> {
        let id = self.id?;
        Some(Agent {
            id,
            name: self
                .name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            email: self.email.unwrap_or_else(|| fallback_email.to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchResponse {
    #[serde(default)]
    pub results: Vec<Ticket>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CommentsResponse {
    #[serde(default)]
    pub comments: Vec<ZendeskComment>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ZendeskComment {
    #[serde(default)]
    pub author_id: Option<u64>,
    /// Zendesk omits the flag on some legacy comments; those are public.
    #[serde(default = "default_public")]
    pub public: bool,
}

const fn default_public() -> bool {
    true
}

impl ZendeskComment {
    pub fn into_comment(self, ticket_id: u64) -> Option<Comment> {
        let visibility =
            if self.public { CommentVisibility::Public } else { CommentVisibility::Internal };
        Some(Comment { ticket_id, author_id: self.author_id?, visibility })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct SatisfactionResponse {
    #[serde(default)]
    pub satisfaction_rating: Option<ZendeskRating>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ZendeskRating {
    #[serde(default)]
    pub score: Option<SatisfactionScore>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl ZendeskRating {
    pub fn into_rating(self, ticket_id: u64) -> Option<SatisfactionRating> {
        Some(SatisfactionRating {
            ticket_id,
            score: self.score?,
            comment: self.comment.filter(|comment| !comment.trim().is_empty()),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct SlaPoliciesResponse {
    #[serde(default)]
    pub sla_policies: Vec<SlaPolicy>,
}
