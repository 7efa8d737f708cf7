use chrono::{DateTime, Duration, TimeZone, Utc};
use prepdesk_domain::{
    Agent, Attendee, Comment, CommentVisibility, Meeting, SatisfactionRating, SatisfactionScore,
    SlaPolicy, SlaPolicyMetric, Ticket, TicketPriority, TicketStatus,
};

pub const AGENT_EMAIL: &str = "dana.agent@acme.test";
pub const AGENT_ID: u64 = 7;

/// Fixed "now" for deterministic windows: Tuesday 2025-03-04 14:30 UTC.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 4, 14, 30, 0).unwrap()
}

pub fn agent() -> Agent {
    Agent { id: AGENT_ID, name: "Dana Agent".into(), email: AGENT_EMAIL.into() }
}

pub fn ticket(id: u64, status: TicketStatus) -> Ticket {
    let created = now() - Duration::days(2);
    Ticket {
        id,
        subject: Some(format!("Ticket number {id}")),
        status,
        priority: Some(TicketPriority::Normal),
        created_at: created,
        updated_at: created,
        url: Some(format!("https://acme.zendesk.com/api/v2/tickets/{id}.json")),
    }
}

pub fn urgent(id: u64, status: TicketStatus) -> Ticket {
    Ticket { priority: Some(TicketPriority::Urgent), ..ticket(id, status) }
}

pub fn created_days_ago(id: u64, status: TicketStatus, days: i64) -> Ticket {
    let created = now() - Duration::days(days);
    Ticket { created_at: created, updated_at: created, ..ticket(id, status) }
}

pub fn comment(ticket_id: u64, author_id: u64, visibility: CommentVisibility) -> Comment {
    Comment { ticket_id, author_id, visibility }
}

pub fn rating(ticket_id: u64, score: SatisfactionScore, comment: Option<&str>) -> SatisfactionRating {
    SatisfactionRating { ticket_id, score, comment: comment.map(str::to_string) }
}

pub fn breached_policy(metric: &str, business_hours: f64) -> SlaPolicy {
    SlaPolicy {
        title: Some("Standard".into()),
        policy_metrics: vec![SlaPolicyMetric {
            metric: Some(metric.into()),
            breach: true,
            business_hours: Some(business_hours),
        }],
    }
}

/// 1-on-1 starting `minutes` after [`now`].
pub fn one_on_one(id: &str, minutes: i64) -> Meeting {
    Meeting::new(
        id,
        "Weekly 1on1 Sync",
        now() + Duration::minutes(minutes),
        vec![Attendee::new("lead@acme.test", true), Attendee::new(AGENT_EMAIL, false)],
    )
}
