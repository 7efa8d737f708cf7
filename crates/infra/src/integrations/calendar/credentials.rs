//! Google credential sourcing
//!
//! Credentials are resolved once at startup into a [`GoogleCredentials`]
//! variant and turned into an [`AccessTokenProvider`]; the calendar adapter
//! only ever sees the provider.
//!
//! Resolution order:
//! 1. `GOOGLE_SERVICE_ACCOUNT_JSON`: service-account key, JWT-bearer grant
//! 2. `GOOGLE_OAUTH_TOKEN_JSON`: authorized-user token held in memory
//! 3. the configured token file (`token.json` by default): authorized-user
//!    token, written back after every refresh

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDateTime, SecondsFormat, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use prepdesk_domain::{CalendarConfig, PrepDeskError, Result};
use reqwest::{Method, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::errors::InfraError;
use crate::http::HttpClient;

/// Google OAuth token endpoint.
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
/// Read-only calendar scope requested by service accounts.
pub const CALENDAR_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

const SERVICE_ACCOUNT_ENV: &str = "GOOGLE_SERVICE_ACCOUNT_JSON";
const OAUTH_TOKEN_ENV: &str = "GOOGLE_OAUTH_TOKEN_JSON";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Tokens this close to expiry are refreshed ahead of use.
const EXPIRY_SKEW_SECS: i64 = 60;
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Provides bearer tokens for Google API calls.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Retrieve a currently valid access token.
    async fn access_token(&self) -> Result<String>;
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

/// Authorized-user token in the `token.json` layout.
///
/// Unknown fields are kept so a written-back file loses nothing.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthorizedUserToken {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub expiry: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl AuthorizedUserToken {
    /// Parse the expiry timestamp. Naive timestamps are read as UTC.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.expiry.as_deref()?.trim();
        DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc)).ok().or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok().map(|n| n.and_utc())
        })
    }

    /// The access token, if present and not about to expire.
    ///
    /// A token without an expiry is taken as valid.
    pub fn valid_access_token(&self, now: DateTime<Utc>) -> Option<&str> {
        let token = self.token.as_deref().filter(|token| !token.is_empty())?;
        match self.expires_at() {
            Some(expiry) if expiry <= now + Duration::seconds(EXPIRY_SKEW_SECS) => None,
            _ => Some(token),
        }
    }

    fn refresh_form(&self) -> Option<[(&'static str, &str); 4]> {
        Some([
            ("grant_type", "refresh_token"),
            ("refresh_token", self.refresh_token.as_deref()?),
            ("client_id", self.client_id.as_deref()?),
            ("client_secret", self.client_secret.as_deref()?),
        ])
    }

    fn apply(&mut self, grant: TokenResponse, now: DateTime<Utc>) {
        self.expiry = grant.expires_in.map(|secs| {
            (now + Duration::seconds(secs)).to_rfc3339_opts(SecondsFormat::Micros, true)
        });
        self.token = Some(grant.access_token);
        if let Some(refresh_token) = grant.refresh_token {
            self.refresh_token = Some(refresh_token);
        }
    }
}

impl fmt::Debug for AuthorizedUserToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedUserToken")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("token_uri", &self.token_uri)
            .field("client_id", &self.client_id)
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

/// Service-account key file contents.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// Where the calendar credentials came from.
#[derive(Debug, Clone)]
pub enum GoogleCredentials {
    ServiceAccount(ServiceAccountKey),
    EnvironmentOAuth(AuthorizedUserToken),
    FileToken { path: PathBuf, token: AuthorizedUserToken },
}

impl GoogleCredentials {
    /// Resolve credentials from the process environment and calendar config.
    pub fn from_env(config: &CalendarConfig) -> Result<Self> {
        Self::resolve(
            env_json(SERVICE_ACCOUNT_ENV),
            env_json(OAUTH_TOKEN_ENV),
            Path::new(&config.token_file),
        )
    }

    /// Resolve credentials from explicit inputs, first match wins.
    pub fn resolve(
        service_account_json: Option<String>,
        oauth_token_json: Option<String>,
        token_file: &Path,
    ) -> Result<Self> {
        if let Some(json) = service_account_json {
            let key: ServiceAccountKey = serde_json::from_str(&json).map_err(|_| {
                PrepDeskError::Config(format!("{SERVICE_ACCOUNT_ENV} is not a service account key"))
            })?;
            return Ok(Self::ServiceAccount(key));
        }

        if let Some(json) = oauth_token_json {
            let token: AuthorizedUserToken = serde_json::from_str(&json).map_err(|_| {
                PrepDeskError::Config(format!("{OAUTH_TOKEN_ENV} is not an authorized-user token"))
            })?;
            return Ok(Self::EnvironmentOAuth(token));
        }

        if !token_file.exists() {
            return Err(PrepDeskError::Auth(format!(
                "no Google credentials: set {SERVICE_ACCOUNT_ENV}, {OAUTH_TOKEN_ENV} or provide {}",
                token_file.display()
            )));
        }
        let contents = std::fs::read_to_string(token_file).map_err(|err| {
            PrepDeskError::Config(format!("failed to read {}: {}", token_file.display(), err.kind()))
        })?;
        let token: AuthorizedUserToken = serde_json::from_str(&contents).map_err(|_| {
            PrepDeskError::Config(format!(
                "{} is not an authorized-user token",
                token_file.display()
            ))
        })?;
        Ok(Self::FileToken { path: token_file.to_path_buf(), token })
    }

    /// Short name of the credential source, safe to log.
    pub const fn source(&self) -> &'static str {
        match self {
            Self::ServiceAccount(_) => "service_account",
            Self::EnvironmentOAuth(_) => "environment_oauth",
            Self::FileToken { .. } => "file_token",
        }
    }

    /// Turn the credentials into a token provider.
    pub fn into_provider(self, http_client: HttpClient) -> Result<Arc<dyn AccessTokenProvider>> {
        info!(source = self.source(), "Google credentials resolved");
        let provider: Arc<dyn AccessTokenProvider> = match self {
            Self::ServiceAccount(key) => Arc::new(ServiceAccountProvider::new(&key, http_client)?),
            Self::EnvironmentOAuth(token) => {
                Arc::new(AuthorizedUserProvider::new(token, None, http_client))
            }
            Self::FileToken { path, token } => {
                Arc::new(AuthorizedUserProvider::new(token, Some(path), http_client))
            }
        };
        Ok(provider)
    }
}

fn env_json(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Exchange a grant at the token endpoint.
///
/// Every non-success status is an auth failure; the body is never read.
async fn request_token(http_client: &HttpClient, builder: RequestBuilder) -> Result<TokenResponse> {
    let response = http_client.send(builder).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(PrepDeskError::Auth(format!(
            "token endpoint returned HTTP {}",
            status.as_u16()
        )));
    }
    let body = response.bytes().await.map_err(|err| PrepDeskError::from(InfraError::from(err)))?;
    serde_json::from_slice(&body).map_err(|_| {
        PrepDeskError::Auth("token endpoint returned an unreadable grant".into())
    })
}

/// Authorized-user tokens, refreshed through the refresh-token grant.
pub struct AuthorizedUserProvider {
    http_client: HttpClient,
    token: Mutex<AuthorizedUserToken>,
    persist_to: Option<PathBuf>,
}

impl AuthorizedUserProvider {
    /// `persist_to` receives the refreshed token after every refresh.
    pub fn new(
        token: AuthorizedUserToken,
        persist_to: Option<PathBuf>,
        http_client: HttpClient,
    ) -> Self {
        Self { http_client, token: Mutex::new(token), persist_to }
    }

    async fn persist(&self, token: &AuthorizedUserToken) {
        let Some(path) = &self.persist_to else {
            return;
        };
        let written = match serde_json::to_string_pretty(token) {
            Ok(json) => tokio::fs::write(path, json).await.map_err(|err| err.kind().to_string()),
            Err(err) => Err(format!("{:?}", err.classify())),
        };
        match written {
            Ok(()) => debug!(path = %path.display(), "refreshed token written back"),
            Err(reason) => warn!(path = %path.display(), %reason, "could not write refreshed token"),
        }
    }
}

#[async_trait]
impl AccessTokenProvider for AuthorizedUserProvider {
    async fn access_token(&self) -> Result<String> {
        let mut token = self.token.lock().await;
        let now = Utc::now();
        if let Some(access) = token.valid_access_token(now) {
            return Ok(access.to_string());
        }

        let form = token.refresh_form().ok_or_else(|| {
            PrepDeskError::Auth("Google token expired and cannot be refreshed".into())
        })?;
        let request = self.http_client.request(Method::POST, &token.token_uri).form(&form);
        let grant = request_token(&self.http_client, request).await?;

        token.apply(grant, now);
        info!("Google access token refreshed");
        self.persist(&token).await;

        token
            .token
            .clone()
            .ok_or_else(|| PrepDeskError::Internal("refreshed token missing access token".into()))
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Service-account tokens through the JWT-bearer grant (RS256).
pub struct ServiceAccountProvider {
    http_client: HttpClient,
    client_email: String,
    key_id: Option<String>,
    token_uri: String,
    encoding_key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountProvider {
    /// Fails when the private key is not a valid RSA PEM.
    pub fn new(key: &ServiceAccountKey, http_client: HttpClient) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|err| PrepDeskError::from(InfraError::from(err)))?;
        Ok(Self {
            http_client,
            client_email: key.client_email.clone(),
            key_id: key.private_key_id.clone(),
            token_uri: key.token_uri.clone(),
            encoding_key,
            cached: Mutex::new(None),
        })
    }

    fn assertion(&self, now: DateTime<Utc>) -> Result<String> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid.clone_from(&self.key_id);
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: CALENDAR_READONLY_SCOPE,
            aud: &self.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };
        jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .map_err(|err| PrepDeskError::from(InfraError::from(err)))
    }
}

#[async_trait]
impl AccessTokenProvider for ServiceAccountProvider {
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref() {
            if token.expires_at > now + Duration::seconds(EXPIRY_SKEW_SECS) {
                return Ok(token.access_token.clone());
            }
        }

        let assertion = self.assertion(now)?;
        let request = self
            .http_client
            .request(Method::POST, &self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())]);
        let grant = request_token(&self.http_client, request).await?;

        let expires_at = now + Duration::seconds(grant.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS));
        let access_token = grant.access_token;
        *cached = Some(CachedToken { access_token: access_token.clone(), expires_at });
        info!("service account access token issued");
        Ok(access_token)
    }
}
