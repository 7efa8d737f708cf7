//! Aggregated agent performance

use serde::Serialize;

use super::ticket::{Agent, CsatTicket, SlaBreach, Ticket};

/// Per-agent performance over the last week.
///
/// Built fresh on every invocation and never merged with or compared to an
/// earlier snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSnapshot {
    /// Agent whose resolution produced every figure below.
    pub agent: Agent,
    pub total_tickets: usize,
    pub solved_tickets: usize,
    pub internal_comments: usize,
    pub external_comments: usize,
    pub urgent_tickets: Vec<Ticket>,
    pub on_hold_tickets: Vec<Ticket>,
    pub aged_tickets: Vec<Ticket>,
    pub positive_csat: Vec<CsatTicket>,
    pub negative_csat: Vec<CsatTicket>,
    pub sla_breaches: Vec<SlaBreach>,
}

impl PerformanceSnapshot {
    /// Share of base tickets that are solved; `None` without base tickets.
    #[allow(clippy::cast_precision_loss)]
    pub fn solved_ratio(&self) -> Option<f64> {
        (self.total_tickets > 0).then(|| self.solved_tickets as f64 / self.total_tickets as f64)
    }

    /// Headline counters, suitable for structured logging.
    pub fn summary(&self) -> SnapshotSummary {
        SnapshotSummary {
            total_tickets: self.total_tickets,
            solved_tickets: self.solved_tickets,
            urgent_tickets: self.urgent_tickets.len(),
            on_hold_tickets: self.on_hold_tickets.len(),
            aged_tickets: self.aged_tickets.len(),
            positive_csat: self.positive_csat.len(),
            negative_csat: self.negative_csat.len(),
            sla_breaches: self.sla_breaches.len(),
        }
    }
}

/// Counts-only view of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SnapshotSummary {
    pub total_tickets: usize,
    pub solved_tickets: usize,
    pub urgent_tickets: usize,
    pub on_hold_tickets: usize,
    pub aged_tickets: usize,
    pub positive_csat: usize,
    pub negative_csat: usize,
    pub sla_breaches: usize,
}
