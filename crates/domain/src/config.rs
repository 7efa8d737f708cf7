//! Configuration management

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_FAN_OUT_CONCURRENCY, DEFAULT_HTTP_MAX_ATTEMPTS, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_TICKETING_DOMAIN, MEETING_KEYWORD, SCAN_MAX_OFFSET_MINUTES, SCAN_MIN_OFFSET_MINUTES,
    SCAN_TOLERANCE_MINUTES,
};

/// Application configuration
///
/// Collaborator credentials may be blank: each adapter rejects its own
/// missing credentials when it is built, so one absent integration does not
/// stop the others from starting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub zendesk: ZendeskConfig,
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Ticketing (Zendesk) configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ZendeskConfig {
    #[serde(default)]
    pub subdomain: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub api_token: String,
    /// Full API base URL; derived from `subdomain` when absent.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Hostname suffix ticket links must belong to.
    #[serde(default = "default_ticketing_domain")]
    pub ticketing_domain: String,
}

impl ZendeskConfig {
    /// API base URL, e.g. `https://acme.zendesk.com/api/v2`.
    pub fn api_base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.zendesk.com/api/v2", self.subdomain),
        }
    }
}

impl fmt::Debug for ZendeskConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZendeskConfig")
            .field("subdomain", &self.subdomain)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("ticketing_domain", &self.ticketing_domain)
            .finish()
    }
}

/// Messaging (Slack) configuration
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SlackConfig {
    #[serde(default, skip_serializing)]
    pub bot_token: String,
    #[serde(default)]
    pub channel_id: String,
    /// Web API base URL; `https://slack.com/api` when absent.
    #[serde(default)]
    pub api_base: Option<String>,
}

impl fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackConfig")
            .field("bot_token", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Calendar (Google) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    pub calendar_id: String,
    /// Calendar API base URL; Google's public endpoint when absent.
    #[serde(default)]
    pub api_base: Option<String>,
    /// Authorized-user token file used when no credential JSON is present in
    /// the environment.
    pub token_file: String,
}

/// Meeting detection window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    pub min_offset_minutes: i64,
    pub max_offset_minutes: i64,
    pub tolerance_minutes: i64,
    pub keyword: String,
}

/// Outbound HTTP behaviour shared by all adapters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub max_attempts: usize,
    /// Parallel per-ticket detail requests.
    pub fan_out_concurrency: usize,
}

fn default_ticketing_domain() -> String {
    DEFAULT_TICKETING_DOMAIN.to_string()
}

impl Default for ZendeskConfig {
    fn default() -> Self {
        Self {
            subdomain: String::new(),
            email: String::new(),
            api_token: String::new(),
            base_url: None,
            ticketing_domain: default_ticketing_domain(),
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self { calendar_id: "primary".to_string(), api_base: None, token_file: "token.json".to_string() }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_offset_minutes: SCAN_MIN_OFFSET_MINUTES,
            max_offset_minutes: SCAN_MAX_OFFSET_MINUTES,
            tolerance_minutes: SCAN_TOLERANCE_MINUTES,
            keyword: MEETING_KEYWORD.to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECS,
            max_attempts: DEFAULT_HTTP_MAX_ATTEMPTS,
            fan_out_concurrency: DEFAULT_FAN_OUT_CONCURRENCY,
        }
    }
}
