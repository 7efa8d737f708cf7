//! Slack Web API client

use async_trait::async_trait;
use prepdesk_core::NotificationSink;
use prepdesk_domain::{HttpConfig, PrepDeskError, Result, SlackConfig};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::http::HttpClient;

/// Public Web API endpoint.
pub const SLACK_API_BASE: &str = "https://slack.com/api";

/// Posts messages with a bot token.
pub struct SlackNotifier {
    base_url: String,
    bot_token: String,
    http_client: HttpClient,
}

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
    mrkdwn: bool,
    unfurl_links: bool,
}

#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

impl SlackNotifier {
    pub fn new(config: &SlackConfig, http: &HttpConfig) -> Result<Self> {
        Self::with_http_client(config, HttpClient::from_config(http)?)
    }

    pub fn with_http_client(config: &SlackConfig, http_client: HttpClient) -> Result<Self> {
        if config.bot_token.trim().is_empty() {
            return Err(PrepDeskError::Config("Slack bot token is required".into()));
        }
        if config.channel_id.trim().is_empty() {
            return Err(PrepDeskError::Config("Slack channel id is required".into()));
        }
        let base_url =
            config.api_base.as_deref().unwrap_or(SLACK_API_BASE).trim_end_matches('/').to_string();
        Ok(Self { base_url, bot_token: config.bot_token.clone(), http_client })
    }
}

/// Slack reports failures as `ok: false` with a short machine-readable code.
fn rejection(code: Option<String>) -> PrepDeskError {
    let code = code.unwrap_or_else(|| "unknown_error".to_string());
    match code.as_str() {
        "invalid_auth" | "not_authed" | "account_inactive" | "token_revoked" | "missing_scope" => {
            PrepDeskError::Auth(format!("Slack rejected the bot token: {code}"))
        }
        "channel_not_found" | "not_in_channel" => {
            PrepDeskError::NotFound(format!("Slack channel unavailable: {code}"))
        }
        _ => PrepDeskError::Network(format!("Slack rejected the message: {code}")),
    }
}

#[async_trait]
impl NotificationSink for SlackNotifier {
    async fn post_message(&self, channel_id: &str, text: &str) -> Result<()> {
        let body = PostMessageRequest { channel: channel_id, text, mrkdwn: true, unfurl_links: false };
        let request = self
            .http_client
            .request(Method::POST, format!("{}/chat.postMessage", self.base_url))
            .bearer_auth(&self.bot_token)
            .json(&body);

        let response: SlackResponse = self.http_client.send_json(request).await?;
        if !response.ok {
            let err = rejection(response.error);
            warn!(error = err.label(), "Slack delivery rejected");
            return Err(err);
        }

        debug!(channel_id, chars = text.chars().count(), "Slack message posted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_codes_map_to_error_classes() {
        assert!(matches!(rejection(Some("invalid_auth".into())), PrepDeskError::Auth(_)));
        assert!(matches!(rejection(Some("channel_not_found".into())), PrepDeskError::NotFound(_)));
        assert!(matches!(rejection(Some("ratelimited".into())), PrepDeskError::Network(_)));
        assert!(matches!(rejection(None), PrepDeskError::Network(_)));
    }

    #[test]
    fn blank_token_is_rejected_at_construction() {
        let config = SlackConfig { bot_token: " ".into(), channel_id: "C1".into(), api_base: None };
        assert!(SlackNotifier::new(&config, &HttpConfig::default()).is_err());
    }
}
