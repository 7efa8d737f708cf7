//! Zendesk REST client

use async_trait::async_trait;
use prepdesk_core::{TicketQuery, TicketingApi};
use prepdesk_domain::{
    Agent, Comment, HttpConfig, PrepDeskError, Result, SatisfactionRating, SlaPolicy, Ticket,
    ZendeskConfig,
};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::types::{
    CommentsResponse, CurrentUserResponse, SatisfactionResponse, SearchResponse,
    SlaPoliciesResponse, UsersResponse,
};
use crate::http::HttpClient;

/// Read-only Zendesk API client.
///
/// Authenticates with an API token (`<email>/token` basic auth). Every method
/// is a single GET; non-2xx responses surface as errors carrying only the
/// status code.
pub struct ZendeskClient {
    base_url: String,
    email: String,
    api_token: String,
    http_client: HttpClient,
}

impl ZendeskClient {
    /// Create a client from the ticketing configuration.
    pub fn new(config: &ZendeskConfig, http: &HttpConfig) -> Result<Self> {
        Self::with_http_client(config, HttpClient::from_config(http)?)
    }

    /// Create a client around an existing HTTP client.
    pub fn with_http_client(config: &ZendeskConfig, http_client: HttpClient) -> Result<Self> {
        if config.email.trim().is_empty() || config.api_token.trim().is_empty() {
            return Err(PrepDeskError::Config("Zendesk email and API token are required".into()));
        }
        if config.base_url.is_none() && config.subdomain.trim().is_empty() {
            return Err(PrepDeskError::Config(
                "Zendesk subdomain or base URL is required".into(),
            ));
        }

        Ok(Self {
            base_url: config.api_base_url(),
            email: config.email.clone(),
            api_token: config.api_token.clone(),
            http_client,
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http_client
            .request(Method::GET, format!("{}/{}", self.base_url, path))
            .basic_auth(format!("{}/token", self.email), Some(&self.api_token))
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        self.http_client.send_json(builder).await
    }
}

#[async_trait]
impl TicketingApi for ZendeskClient {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<Agent>> {
        let request = self.get("users/search.json").query(&[("query", format!("email:{email}"))]);
        let response: UsersResponse = self.fetch(request).await?;
        Ok(response.users.into_iter().find_map(|user| user.into_agent(email)))
    }

    async fn search_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>> {
        let mut params = vec![("query", query.search_string())];
        if let Some((sort_by, sort_order)) = query.sort_params() {
            params.push(("sort_by", sort_by.to_string()));
            params.push(("sort_order", sort_order.to_string()));
        }

        let response: SearchResponse = self.fetch(self.get("search.json").query(&params)).await?;
        debug!(
            assignee_id = query.assignee_id(),
            results = response.results.len(),
            "ticket search completed"
        );
        Ok(response.results)
    }

    async fn ticket_comments(&self, ticket_id: u64) -> Result<Vec<Comment>> {
        let request = self.get(&format!("tickets/{ticket_id}/comments.json"));
        let response: CommentsResponse = self.fetch(request).await?;
        Ok(response.comments.into_iter().filter_map(|c| c.into_comment(ticket_id)).collect())
    }

    async fn satisfaction_rating(&self, ticket_id: u64) -> Result<Option<SatisfactionRating>> {
        let request = self.get(&format!("tickets/{ticket_id}/satisfaction_rating.json"));
        match self.fetch::<SatisfactionResponse>(request).await {
            Ok(response) => {
                Ok(response.satisfaction_rating.and_then(|rating| rating.into_rating(ticket_id)))
            }
            // Zendesk answers 404 for tickets that were never rated.
            Err(PrepDeskError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn sla_policies(&self, ticket_id: u64) -> Result<Vec<SlaPolicy>> {
        let request = self.get(&format!("tickets/{ticket_id}/sla_policies.json"));
        match self.fetch::<SlaPoliciesResponse>(request).await {
            Ok(response) => Ok(response.sla_policies),
            Err(PrepDeskError::NotFound(_)) => Ok(Vec::new()),
            Err(err) => Err(err),
        }
    }

    async fn check_connection(&self) -> Result<()> {
        let response: CurrentUserResponse = self.fetch(self.get("users/me.json")).await?;
        match response.user.id {
            Some(user_id) => {
                info!(user_id, "Zendesk connection verified");
                Ok(())
            }
            None => Err(PrepDeskError::Auth("Zendesk credentials resolved to anonymous user".into())),
        }
    }
}
