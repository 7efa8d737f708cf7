//! Per-agent ticket views
//!
//! Every view is an independent search scoped to the resolved agent id. The
//! CSAT, SLA and comment views fan out one detail request per candidate
//! ticket; a failing detail request only removes that ticket's contribution.
//! A failing search yields an empty view. Nothing here returns an error: a
//! transport failure reads as "no data".

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use futures::future;
use futures::stream::{self, StreamExt};
use prepdesk_domain::constants::{AGED_TICKET_DAYS, DEFAULT_FAN_OUT_CONCURRENCY, RECENT_WINDOW_DAYS};
use prepdesk_domain::{
    Agent, Comment, CommentVisibility, CsatPolarity, CsatTicket, SlaBreach, SlaPolicy, Ticket,
    TicketStatus,
};
use tracing::{debug, info, warn};

use super::query::{DateField, SortField, SortOrder, StatusFilter, TicketQuery};
use super::validation::normalize_email;
use crate::ports::TicketingApi;

/// Comments written by the agent, split by visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentCounts {
    pub internal: usize,
    pub external: usize,
}

impl CommentCounts {
    /// Count the comments authored by `agent_id`; other authors are ignored.
    pub fn tally(agent_id: u64, comments: &[Comment]) -> Self {
        comments.iter().filter(|comment| comment.author_id == agent_id).fold(
            Self::default(),
            |mut counts, comment| {
                match comment.visibility {
                    CommentVisibility::Public => counts.external += 1,
                    CommentVisibility::Internal => counts.internal += 1,
                }
                counts
            },
        )
    }

    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self { internal: self.internal + other.internal, external: self.external + other.external }
    }
}

/// Ticket views for one agent at a time.
pub struct TicketSource {
    api: Arc<dyn TicketingApi>,
    concurrency: usize,
}

impl TicketSource {
    /// Create a source with the default fan-out concurrency.
    pub fn new(api: Arc<dyn TicketingApi>) -> Self {
        Self::with_concurrency(api, DEFAULT_FAN_OUT_CONCURRENCY)
    }

    /// Create a source issuing at most `concurrency` detail requests at once.
    pub fn with_concurrency(api: Arc<dyn TicketingApi>, concurrency: usize) -> Self {
        Self { api, concurrency: concurrency.max(1) }
    }

    /// Resolve an agent email to a ticketing user.
    ///
    /// Malformed emails, unknown users and failed lookups all resolve to
    /// `None`; every view is then empty for that agent.
    pub async fn resolve_agent(&self, email: &str) -> Option<Agent> {
        let email = match normalize_email(email) {
            Ok(email) => email,
            Err(err) => {
                warn!(error = err.label(), "rejected agent email");
                return None;
            }
        };

        match self.api.find_user_by_email(&email).await {
            Ok(Some(agent)) => {
                debug!(agent_id = agent.id, "resolved agent");
                Some(agent)
            }
            Ok(None) => {
                info!("no ticketing user matches the agent email");
                None
            }
            Err(err) => {
                warn!(error = err.label(), "agent lookup failed");
                None
            }
        }
    }

    /// View (a): tickets created in the last 7 days, newest first.
    pub async fn recent_tickets(&self, agent: &Agent, now: DateTime<Utc>) -> Vec<Ticket> {
        let query = TicketQuery::assigned_to(agent.id)
            .since(DateField::Created, days_ago(now, RECENT_WINDOW_DAYS))
            .sorted_by(SortField::CreatedAt, SortOrder::Desc);
        self.search("recent", &query).await
    }

    /// View (b): unsolved tickets created more than 14 days ago, oldest
    /// first.
    ///
    /// The search is day-granular, so results are re-checked against the
    /// exact cutoff and against resolved statuses.
    pub async fn aged_tickets(&self, agent: &Agent, now: DateTime<Utc>) -> Vec<Ticket> {
        let cutoff = now - Duration::days(AGED_TICKET_DAYS);
        let query = TicketQuery::assigned_to(agent.id)
            .until(DateField::Created, cutoff.date_naive())
            .with_status(StatusFilter::Before(TicketStatus::Solved))
            .sorted_by(SortField::CreatedAt, SortOrder::Asc);

        let candidates = self.search("aged", &query).await;
        let found = candidates.len();
        let aged: Vec<Ticket> = candidates
            .into_iter()
            .filter(|ticket| !ticket.status.is_resolved() && ticket.created_at <= cutoff)
            .collect();

        if aged.len() < found {
            debug!(dropped = found - aged.len(), "aged view dropped tickets outside the window");
        }
        aged
    }

    /// Views (c) and (d): tickets solved in the last 7 days whose
    /// satisfaction score has the requested polarity.
    pub async fn csat_tickets(
        &self,
        agent: &Agent,
        now: DateTime<Utc>,
        polarity: CsatPolarity,
    ) -> Vec<CsatTicket> {
        let query = TicketQuery::assigned_to(agent.id)
            .since(DateField::Updated, days_ago(now, RECENT_WINDOW_DAYS))
            .with_status(StatusFilter::Is(TicketStatus::Solved))
            .sorted_by(SortField::UpdatedAt, SortOrder::Desc);
        let candidates = self.search("csat", &query).await;

        let api = &self.api;
        self.fan_out(candidates, |ticket| async move {
            match api.satisfaction_rating(ticket.id).await {
                Ok(Some(rating)) if polarity.matches(rating.score) => {
                    Some(CsatTicket { ticket, rating })
                }
                Ok(_) => None,
                Err(err) => {
                    warn!(
                        ticket_id = ticket.id,
                        error = err.label(),
                        "satisfaction lookup failed, skipping ticket"
                    );
                    None
                }
            }
        })
        .await
    }

    /// View (e): tickets updated in the last 7 days with a breached SLA
    /// metric. One record per ticket, for its first breached metric.
    pub async fn sla_breaches(&self, agent: &Agent, now: DateTime<Utc>) -> Vec<SlaBreach> {
        let query = TicketQuery::assigned_to(agent.id)
            .since(DateField::Updated, days_ago(now, RECENT_WINDOW_DAYS))
            .sorted_by(SortField::UpdatedAt, SortOrder::Desc);
        let candidates = self.search("sla", &query).await;

        let api = &self.api;
        self.fan_out(candidates, |ticket| async move {
            match api.sla_policies(ticket.id).await {
                Ok(policies) => first_breach(ticket, &policies),
                Err(err) => {
                    warn!(
                        ticket_id = ticket.id,
                        error = err.label(),
                        "SLA policy lookup failed, skipping ticket"
                    );
                    None
                }
            }
        })
        .await
    }

    /// Internal and public comments the agent wrote on `tickets`.
    pub async fn comment_counts(&self, agent: &Agent, tickets: &[Ticket]) -> CommentCounts {
        let api = &self.api;
        let agent_id = agent.id;
        let ticket_ids: Vec<u64> = tickets.iter().map(|ticket| ticket.id).collect();

        let per_ticket = self
            .fan_out(ticket_ids, |ticket_id| async move {
                match api.ticket_comments(ticket_id).await {
                    Ok(comments) => Some(CommentCounts::tally(agent_id, &comments)),
                    Err(err) => {
                        warn!(ticket_id, error = err.label(), "comment lookup failed, skipping ticket");
                        None
                    }
                }
            })
            .await;

        per_ticket.into_iter().fold(CommentCounts::default(), CommentCounts::merge)
    }

    async fn search(&self, view: &'static str, query: &TicketQuery) -> Vec<Ticket> {
        match self.api.search_tickets(query).await {
            Ok(tickets) => {
                debug!(view, count = tickets.len(), "ticket search completed");
                tickets
            }
            Err(err) => {
                warn!(view, error = err.label(), "ticket search failed, treating view as empty");
                Vec::new()
            }
        }
    }

    /// Run `lookup` over `items` with bounded concurrency, keeping input
    /// order and dropping `None` results.
    async fn fan_out<T, R, F, Fut>(&self, items: Vec<T>, lookup: F) -> Vec<R>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Option<R>>,
    {
        stream::iter(items)
            .map(lookup)
            .buffered(self.concurrency)
            .filter_map(future::ready)
            .collect()
            .await
    }
}

fn days_ago(now: DateTime<Utc>, days: i64) -> NaiveDate {
    (now - Duration::days(days)).date_naive()
}

fn first_breach(ticket: Ticket, policies: &[SlaPolicy]) -> Option<SlaBreach> {
    let metric = policies
        .iter()
        .flat_map(|policy| policy.policy_metrics.iter())
        .find(|metric| metric.breach && metric.business_hours.is_some())?;
    SlaBreach::from_metric(ticket, metric)
}
