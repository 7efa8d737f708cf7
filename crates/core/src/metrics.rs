//! Per-agent performance snapshot assembly

use chrono::{DateTime, Utc};
use prepdesk_domain::{CsatPolarity, PerformanceSnapshot, Ticket};
use tracing::{debug, info, instrument};

use crate::tickets::TicketSource;

/// Composes the ticket views into one [`PerformanceSnapshot`].
pub struct MetricsAggregator {
    source: TicketSource,
}

impl MetricsAggregator {
    pub fn new(source: TicketSource) -> Self {
        Self { source }
    }

    /// Build the snapshot for the agent behind `agent_email`.
    ///
    /// Returns `None` when the agent cannot be resolved or has no tickets
    /// created in the last week; the remaining views are not queried then.
    /// Views are independent searches, so figures are not a consistent cut.
    #[instrument(skip(self, agent_email))]
    pub async fn build_snapshot(
        &self,
        agent_email: &str,
        now: DateTime<Utc>,
    ) -> Option<PerformanceSnapshot> {
        let agent = self.source.resolve_agent(agent_email).await?;

        let base = self.source.recent_tickets(&agent, now).await;
        if base.is_empty() {
            info!(agent_id = agent.id, "no recent tickets, skipping snapshot");
            return None;
        }

        let comments = self.source.comment_counts(&agent, &base).await;
        let aged_tickets = self.source.aged_tickets(&agent, now).await;
        let positive_csat = self.source.csat_tickets(&agent, now, CsatPolarity::Positive).await;
        let negative_csat = self.source.csat_tickets(&agent, now, CsatPolarity::Negative).await;
        let sla_breaches = self.source.sla_breaches(&agent, now).await;

        let snapshot = PerformanceSnapshot {
            total_tickets: base.len(),
            solved_tickets: base.iter().filter(|ticket| ticket.is_solved()).count(),
            internal_comments: comments.internal,
            external_comments: comments.external,
            urgent_tickets: select(&base, Ticket::is_urgent),
            on_hold_tickets: select(&base, Ticket::is_on_hold),
            aged_tickets,
            positive_csat,
            negative_csat,
            sla_breaches,
            agent,
        };

        debug!(agent_id = snapshot.agent.id, summary = ?snapshot.summary(), "snapshot built");
        Some(snapshot)
    }
}

fn select(tickets: &[Ticket], keep: impl Fn(&Ticket) -> bool) -> Vec<Ticket> {
    tickets.iter().filter(|ticket| keep(ticket)).cloned().collect()
}
