//! Discussion points derived from a snapshot

use prepdesk_domain::constants::{
    INTERNAL_COMMENT_RATIO, SOLVED_RATIO_THRESHOLD, URGENT_TICKET_THRESHOLD,
};
use prepdesk_domain::PerformanceSnapshot;
use serde::Serialize;

/// Topic suggested for the 1-on-1. Rules are independent; several can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscussionPoint {
    WorkloadReview,
    ResolutionRate,
    Prioritization,
    OnHoldReview,
    AgingTickets,
    NegativeFeedback,
    SlaBreaches,
    CommunicationEfficiency,
}

impl DiscussionPoint {
    pub const fn message(self) -> &'static str {
        match self {
            Self::WorkloadReview => "No tickets assigned last week, discuss workload distribution",
            Self::ResolutionRate => "Ticket resolution rate could be improved",
            Self::Prioritization => "High number of urgent tickets, discuss prioritization",
            Self::OnHoldReview => "Review on-hold tickets and next steps",
            Self::AgingTickets => "Address aging tickets, consider escalation or closure",
            Self::NegativeFeedback => "Review negative feedback and improvement opportunities",
            Self::SlaBreaches => "Discuss SLA breach prevention strategies",
            Self::CommunicationEfficiency => {
                "High internal comment ratio, review communication efficiency"
            }
        }
    }

    pub const fn emoji(self) -> &'static str {
        match self {
            Self::WorkloadReview => ":thinking_face:",
            Self::ResolutionRate => ":chart_with_upwards_trend:",
            Self::Prioritization => ":rotating_light:",
            Self::OnHoldReview => ":double_vertical_bar:",
            Self::AgingTickets => ":calendar:",
            Self::NegativeFeedback => ":pensive:",
            Self::SlaBreaches => ":alarm_clock:",
            Self::CommunicationEfficiency => ":thought_balloon:",
        }
    }
}

/// Every point that applies to `snapshot`, in report order.
pub fn discussion_points(snapshot: &PerformanceSnapshot) -> Vec<DiscussionPoint> {
    let mut points = Vec::new();

    match snapshot.solved_ratio() {
        None => points.push(DiscussionPoint::WorkloadReview),
        Some(ratio) if ratio < SOLVED_RATIO_THRESHOLD => {
            points.push(DiscussionPoint::ResolutionRate);
        }
        Some(_) => {}
    }

    let rules = [
        (snapshot.urgent_tickets.len() > URGENT_TICKET_THRESHOLD, DiscussionPoint::Prioritization),
        (!snapshot.on_hold_tickets.is_empty(), DiscussionPoint::OnHoldReview),
        (!snapshot.aged_tickets.is_empty(), DiscussionPoint::AgingTickets),
        (!snapshot.negative_csat.is_empty(), DiscussionPoint::NegativeFeedback),
        (!snapshot.sla_breaches.is_empty(), DiscussionPoint::SlaBreaches),
        (
            snapshot.internal_comments > snapshot.external_comments * INTERNAL_COMMENT_RATIO,
            DiscussionPoint::CommunicationEfficiency,
        ),
    ];
    points.extend(rules.into_iter().filter_map(|(applies, point)| applies.then_some(point)));

    points
}
