//! Zendesk adapter against a mock API server.

mod support;

use chrono::NaiveDate;
use prepdesk_core::tickets::{DateField, SortField, SortOrder};
use prepdesk_core::{TicketQuery, TicketingApi};
use prepdesk_domain::{CommentVisibility, PrepDeskError, SatisfactionScore, TicketStatus};
use prepdesk_infra::ZendeskClient;
use serde_json::json;
use support::{http_client, zendesk_config, ZENDESK_EMAIL, ZENDESK_TOKEN};
use wiremock::matchers::{basic_auth, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> ZendeskClient {
    ZendeskClient::with_http_client(&zendesk_config(&server.uri()), http_client())
        .expect("zendesk client")
}

fn ticket_json(id: u64, status: &str, priority: Option<&str>) -> serde_json::Value {
    json!({
        "id": id,
        "subject": format!("Ticket {id}"),
        "status": status,
        "priority": priority,
        "created_at": "2025-03-01T10:00:00Z",
        "updated_at": "2025-03-02T10:00:00Z",
        "url": format!("https://acme.zendesk.com/api/v2/tickets/{id}.json"),
        "requester_id": 99
    })
}

#[tokio::test]
async fn finds_user_with_token_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/search.json"))
        .and(query_param("query", "email:dana.agent@acme.test"))
        .and(basic_auth(format!("{ZENDESK_EMAIL}/token"), ZENDESK_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{"id": 7, "name": "Dana Agent", "email": "dana.agent@acme.test", "role": "agent"}],
            "count": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let agent = client(&server)
        .await
        .find_user_by_email("dana.agent@acme.test")
        .await
        .expect("lookup")
        .expect("agent");
    assert_eq!(agent.id, 7);
    assert_eq!(agent.name, "Dana Agent");
}

#[tokio::test]
async fn unknown_user_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"users": [], "count": 0})))
        .mount(&server)
        .await;

    let agent = client(&server).await.find_user_by_email("ghost@acme.test").await.expect("lookup");
    assert!(agent.is_none());
}

#[tokio::test]
async fn search_sends_query_and_sort() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("query", "assignee:7 created>=2025-02-25 type:ticket"))
        .and(query_param("sort_by", "created_at"))
        .and(query_param("sort_order", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [ticket_json(1, "solved", None), ticket_json(2, "hold", Some("urgent"))],
            "count": 2,
            "next_page": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = TicketQuery::assigned_to(7)
        .since(DateField::Created, NaiveDate::from_ymd_opt(2025, 2, 25).unwrap())
        .sorted_by(SortField::CreatedAt, SortOrder::Desc);
    let tickets = client(&server).await.search_tickets(&query).await.expect("search");

    assert_eq!(tickets.len(), 2);
    assert_eq!(tickets[0].status, TicketStatus::Solved);
    assert!(tickets[1].is_urgent());
    assert!(tickets[1].is_on_hold());
}

#[tokio::test]
async fn comments_carry_visibility() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickets/42/comments.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "comments": [
                {"id": 1, "author_id": 7, "public": true, "body": "Hi"},
                {"id": 2, "author_id": 7, "public": false, "body": "note"}
            ]
        })))
        .mount(&server)
        .await;

    let comments = client(&server).await.ticket_comments(42).await.expect("comments");
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].visibility, CommentVisibility::Public);
    assert_eq!(comments[1].visibility, CommentVisibility::Internal);
}

#[tokio::test]
async fn rating_is_read_and_missing_rating_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickets/5/satisfaction_rating.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "satisfaction_rating": {"id": 900, "score": "bad", "comment": "Too slow"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tickets/6/satisfaction_rating.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let zendesk = client(&server).await;
    let rating = zendesk.satisfaction_rating(5).await.expect("rating").expect("rated");
    assert_eq!(rating.score, SatisfactionScore::Bad);
    assert_eq!(rating.comment.as_deref(), Some("Too slow"));
    assert!(zendesk.satisfaction_rating(6).await.expect("rating").is_none());
}

#[tokio::test]
async fn sla_policies_keep_provider_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tickets/8/sla_policies.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sla_policies": [{
                "title": "Priority",
                "policy_metrics": [
                    {"metric": "first_reply_time", "breach": false, "business_hours": null},
                    {"metric": "next_reply_time", "breach": true, "business_hours": 150}
                ]
            }]
        })))
        .mount(&server)
        .await;

    let policies = client(&server).await.sla_policies(8).await.expect("policies");
    assert_eq!(policies.len(), 1);
    let metrics = &policies[0].policy_metrics;
    assert_eq!(metrics.len(), 2);
    assert!(metrics[1].breach);
    assert_eq!(metrics[1].business_hours, Some(150.0));
}

#[tokio::test]
async fn error_status_never_leaks_body_or_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(format!("bad credentials for {ZENDESK_TOKEN}")),
        )
        .mount(&server)
        .await;

    let err = client(&server).await.search_tickets(&TicketQuery::assigned_to(1)).await.unwrap_err();
    let rendered = err.to_string();
    assert!(matches!(err, PrepDeskError::Auth(_)));
    assert!(rendered.contains("401"));
    assert!(!rendered.contains(ZENDESK_TOKEN));
    assert!(!rendered.contains("bad credentials"));
}

#[tokio::test]
async fn connection_check_uses_current_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"user": {"id": 3, "name": "Ops"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    client(&server).await.check_connection().await.expect("connection ok");
}

#[tokio::test]
async fn anonymous_current_user_fails_connection_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"user": {"id": null, "name": "Anonymous user"}})),
        )
        .mount(&server)
        .await;

    let err = client(&server).await.check_connection().await.unwrap_err();
    assert!(matches!(err, PrepDeskError::Auth(_)));
}
