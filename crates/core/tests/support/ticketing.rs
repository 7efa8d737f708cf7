use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use prepdesk_core::{TicketQuery, TicketingApi};
use prepdesk_domain::{
    Agent, Comment, PrepDeskError, Result as DomainResult, SatisfactionRating, SlaPolicy, Ticket,
};

/// Which per-agent view a search belongs to, read off the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Recent,
    Aged,
    Csat,
    Sla,
}

impl View {
    pub fn of(query: &TicketQuery) -> Self {
        let search = query.search_string();
        if search.contains("created>=") {
            Self::Recent
        } else if search.contains("created<=") {
            Self::Aged
        } else if search.contains("status:solved") {
            Self::Csat
        } else {
            Self::Sla
        }
    }
}

fn unavailable() -> PrepDeskError {
    PrepDeskError::Network("HTTP 503".into())
}

/// In-memory mock for `TicketingApi`.
///
/// Seed it with builder calls before wrapping it in an `Arc`; every call is
/// recorded for later assertions.
#[derive(Default, Clone)]
pub struct MockTicketingApi {
    agents: HashMap<String, Agent>,
    agent_lookup_fails: bool,
    views: HashMap<View, Vec<Ticket>>,
    failing_views: Vec<View>,
    comments: HashMap<u64, Vec<Comment>>,
    ratings: HashMap<u64, SatisfactionRating>,
    policies: HashMap<u64, Vec<SlaPolicy>>,
    failing_details: Vec<u64>,
    connection_fails: bool,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockTicketingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_agent(mut self, agent: Agent) -> Self {
        self.agents.insert(agent.email.clone(), agent);
        self
    }

    pub fn failing_agent_lookup(mut self) -> Self {
        self.agent_lookup_fails = true;
        self
    }

    pub fn with_view(mut self, view: View, tickets: Vec<Ticket>) -> Self {
        self.views.insert(view, tickets);
        self
    }

    pub fn failing_view(mut self, view: View) -> Self {
        self.failing_views.push(view);
        self
    }

    pub fn with_comments(mut self, ticket_id: u64, comments: Vec<Comment>) -> Self {
        self.comments.insert(ticket_id, comments);
        self
    }

    pub fn with_rating(mut self, rating: SatisfactionRating) -> Self {
        self.ratings.insert(rating.ticket_id, rating);
        self
    }

    pub fn with_policies(mut self, ticket_id: u64, policies: Vec<SlaPolicy>) -> Self {
        self.policies.insert(ticket_id, policies);
        self
    }

    /// Comment, rating and SLA requests for `ticket_id` fail.
    pub fn failing_details_for(mut self, ticket_id: u64) -> Self {
        self.failing_details.push(ticket_id);
        self
    }

    pub fn failing_connection(mut self) -> Self {
        self.connection_fails = true;
        self
    }

    /// Calls made so far, e.g. `search:assignee:7 ...` or `comments:12`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn search_count(&self) -> usize {
        self.calls().iter().filter(|call| call.starts_with("search:")).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn detail(&self, kind: &str, ticket_id: u64) -> DomainResult<()> {
        self.record(format!("{kind}:{ticket_id}"));
        if self.failing_details.contains(&ticket_id) {
            return Err(unavailable());
        }
        Ok(())
    }
}

#[async_trait]
impl TicketingApi for MockTicketingApi {
    async fn find_user_by_email(&self, email: &str) -> DomainResult<Option<Agent>> {
        self.record(format!("user:{email}"));
        if self.agent_lookup_fails {
            return Err(unavailable());
        }
        Ok(self.agents.get(email).cloned())
    }

    async fn search_tickets(&self, query: &TicketQuery) -> DomainResult<Vec<Ticket>> {
        self.record(format!("search:{query}"));
        let view = View::of(query);
        if self.failing_views.contains(&view) {
            return Err(unavailable());
        }
        Ok(self.views.get(&view).cloned().unwrap_or_default())
    }

    async fn ticket_comments(&self, ticket_id: u64) -> DomainResult<Vec<Comment>> {
        self.detail("comments", ticket_id)?;
        Ok(self.comments.get(&ticket_id).cloned().unwrap_or_default())
    }

    async fn satisfaction_rating(&self, ticket_id: u64) -> DomainResult<Option<SatisfactionRating>> {
        self.detail("rating", ticket_id)?;
        Ok(self.ratings.get(&ticket_id).cloned())
    }

    async fn sla_policies(&self, ticket_id: u64) -> DomainResult<Vec<SlaPolicy>> {
        self.detail("sla", ticket_id)?;
        Ok(self.policies.get(&ticket_id).cloned().unwrap_or_default())
    }

    async fn check_connection(&self) -> DomainResult<()> {
        self.record("me".to_string());
        if self.connection_fails {
            return Err(PrepDeskError::Auth("HTTP 401".into()));
        }
        Ok(())
    }
}
