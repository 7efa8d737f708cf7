//! Snapshot assembly against an in-memory ticketing API.

mod support;

use std::sync::Arc;

use chrono::Duration;
use prepdesk_core::{MetricsAggregator, TicketSource};
use prepdesk_domain::{CommentVisibility, SatisfactionScore, TicketStatus};
use support::fixtures::{
    agent, breached_policy, comment, created_days_ago, now, rating, ticket, urgent, AGENT_EMAIL,
    AGENT_ID,
};
use support::ticketing::{MockTicketingApi, View};

fn aggregator(api: &MockTicketingApi) -> MetricsAggregator {
    MetricsAggregator::new(TicketSource::with_concurrency(Arc::new(api.clone()), 2))
}

fn busy_week() -> MockTicketingApi {
    let mut base: Vec<_> = (1..=4).map(|id| urgent(id, TicketStatus::Solved)).collect();
    base.extend((5..=9).map(|id| ticket(id, TicketStatus::Solved)));
    base.push(ticket(10, TicketStatus::Hold));

    MockTicketingApi::new()
        .with_agent(agent())
        .with_view(View::Recent, base)
        .with_view(
            View::Aged,
            vec![
                created_days_ago(11, TicketStatus::Open, 20),
                created_days_ago(12, TicketStatus::Solved, 20),
                created_days_ago(13, TicketStatus::Pending, 10),
            ],
        )
        .with_view(
            View::Csat,
            (21..=25).map(|id| ticket(id, TicketStatus::Solved)).collect(),
        )
        .with_view(View::Sla, vec![ticket(31, TicketStatus::Open), ticket(32, TicketStatus::Open)])
        .with_comments(
            1,
            vec![
                comment(1, AGENT_ID, CommentVisibility::Public),
                comment(1, AGENT_ID, CommentVisibility::Public),
                comment(1, AGENT_ID, CommentVisibility::Internal),
                comment(1, 99, CommentVisibility::Public),
            ],
        )
        .with_comments(3, vec![comment(3, AGENT_ID, CommentVisibility::Internal)])
        .failing_details_for(2)
        .with_rating(rating(21, SatisfactionScore::Great, Some("Quick fix, thanks")))
        .with_rating(rating(22, SatisfactionScore::Bad, None))
        .with_rating(rating(23, SatisfactionScore::Offered, None))
        .with_rating(rating(24, SatisfactionScore::Good, None))
        .failing_details_for(25)
        .with_policies(31, vec![breached_policy("first_reply_time", 150.0)])
}

#[tokio::test]
async fn builds_full_snapshot() {
    let api = busy_week();
    let snapshot = aggregator(&api).build_snapshot(AGENT_EMAIL, now()).await.unwrap();

    assert_eq!(snapshot.agent.id, AGENT_ID);
    assert_eq!(snapshot.total_tickets, 10);
    assert_eq!(snapshot.solved_tickets, 9);
    assert_eq!(snapshot.urgent_tickets.len(), 4);
    assert_eq!(snapshot.on_hold_tickets.len(), 1);
    assert_eq!(snapshot.external_comments, 2);
    assert_eq!(snapshot.internal_comments, 2);

    let aged: Vec<u64> = snapshot.aged_tickets.iter().map(|t| t.id).collect();
    assert_eq!(aged, vec![11]);

    let positive: Vec<u64> = snapshot.positive_csat.iter().map(|c| c.ticket.id).collect();
    assert_eq!(positive, vec![21, 24]);
    let negative: Vec<u64> = snapshot.negative_csat.iter().map(|c| c.ticket.id).collect();
    assert_eq!(negative, vec![22]);

    assert_eq!(snapshot.sla_breaches.len(), 1);
    assert_eq!(snapshot.sla_breaches[0].ticket.id, 31);
    assert_eq!(snapshot.sla_breaches[0].breach_minutes, 150);
    assert!((snapshot.sla_breaches[0].breach_hours() - 2.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn aged_tickets_respect_cutoff_and_status() {
    let api = busy_week();
    let snapshot = aggregator(&api).build_snapshot(AGENT_EMAIL, now()).await.unwrap();

    let cutoff = now() - Duration::days(14);
    for ticket in &snapshot.aged_tickets {
        assert!(ticket.created_at <= cutoff);
        assert!(!matches!(ticket.status, TicketStatus::Solved | TicketStatus::Closed));
    }
}

#[tokio::test]
async fn no_recent_tickets_means_no_snapshot() {
    let api = MockTicketingApi::new()
        .with_agent(agent())
        .with_view(View::Aged, vec![created_days_ago(11, TicketStatus::Open, 20)]);

    assert!(aggregator(&api).build_snapshot(AGENT_EMAIL, now()).await.is_none());
    assert_eq!(api.search_count(), 1, "other views must not be queried");
}

#[tokio::test]
async fn unknown_agent_means_no_snapshot() {
    let api = MockTicketingApi::new().with_view(View::Recent, vec![ticket(1, TicketStatus::Open)]);

    assert!(aggregator(&api).build_snapshot(AGENT_EMAIL, now()).await.is_none());
    assert_eq!(api.search_count(), 0);
}

#[tokio::test]
async fn failed_agent_lookup_means_no_snapshot() {
    let api = busy_week().failing_agent_lookup();
    assert!(aggregator(&api).build_snapshot(AGENT_EMAIL, now()).await.is_none());
    assert_eq!(api.search_count(), 0);
}

#[tokio::test]
async fn malformed_email_is_never_looked_up() {
    let api = busy_week();
    assert!(aggregator(&api).build_snapshot("not-an-email", now()).await.is_none());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn agent_email_is_normalized_before_lookup() {
    let api = busy_week();
    let snapshot = aggregator(&api).build_snapshot("  Dana.Agent@ACME.test ", now()).await;

    assert!(snapshot.is_some());
    assert_eq!(api.calls()[0], format!("user:{AGENT_EMAIL}"));
}

#[tokio::test]
async fn failed_recent_search_means_no_snapshot() {
    let api = busy_week().failing_view(View::Recent);
    assert!(aggregator(&api).build_snapshot(AGENT_EMAIL, now()).await.is_none());
}

#[tokio::test]
async fn failed_secondary_views_are_empty() {
    let api = busy_week().failing_view(View::Aged).failing_view(View::Csat).failing_view(View::Sla);
    let snapshot = aggregator(&api).build_snapshot(AGENT_EMAIL, now()).await.unwrap();

    assert_eq!(snapshot.total_tickets, 10);
    assert!(snapshot.aged_tickets.is_empty());
    assert!(snapshot.positive_csat.is_empty());
    assert!(snapshot.negative_csat.is_empty());
    assert!(snapshot.sla_breaches.is_empty());
}

#[tokio::test]
async fn searches_are_scoped_to_the_agent() {
    let api = busy_week();
    aggregator(&api).build_snapshot(AGENT_EMAIL, now()).await.unwrap();

    let searches: Vec<String> =
        api.calls().into_iter().filter(|call| call.starts_with("search:")).collect();
    assert_eq!(
        searches,
        vec![
            "search:assignee:7 created>=2025-02-25 type:ticket",
            "search:assignee:7 created<=2025-02-18 status<solved type:ticket",
            "search:assignee:7 updated>=2025-02-25 status:solved type:ticket",
            "search:assignee:7 updated>=2025-02-25 status:solved type:ticket",
            "search:assignee:7 updated>=2025-02-25 type:ticket",
        ]
    );
}
