//! Google Calendar meeting source

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use prepdesk_core::MeetingSource;
use prepdesk_domain::{Attendee, CalendarConfig, HttpConfig, Meeting, PrepDeskError, Result};
use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use super::credentials::{AccessTokenProvider, GoogleCredentials};
use crate::http::HttpClient;

/// Public Calendar API endpoint.
pub const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Lists events of one calendar as [`Meeting`]s.
pub struct GoogleCalendarSource {
    events_url: Url,
    http_client: HttpClient,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl GoogleCalendarSource {
    /// Build a source for `config.calendar_id` with an injected token provider.
    pub fn new(
        config: &CalendarConfig,
        http_client: HttpClient,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self> {
        let base = config.api_base.as_deref().unwrap_or(GOOGLE_CALENDAR_API_BASE);
        let events_url = events_url(base, &config.calendar_id)?;
        Ok(Self { events_url, http_client, tokens })
    }

    /// Resolve credentials from the environment and build the source.
    pub fn from_env(config: &CalendarConfig, http: &HttpConfig) -> Result<Self> {
        let http_client = HttpClient::from_config(http)?;
        let tokens = GoogleCredentials::from_env(config)?.into_provider(http_client.clone())?;
        Self::new(config, http_client, tokens)
    }
}

/// `<base>/calendars/<calendar_id>/events`, with the id percent-encoded as a
/// single path segment.
fn events_url(base: &str, calendar_id: &str) -> Result<Url> {
    if calendar_id.trim().is_empty() {
        return Err(PrepDeskError::Config("calendar id must not be empty".into()));
    }
    let mut url = Url::parse(base)
        .map_err(|err| PrepDeskError::Config(format!("invalid calendar API base: {err}")))?;
    url.path_segments_mut()
        .map_err(|()| PrepDeskError::Config("calendar API base cannot carry a path".into()))?
        .pop_if_empty()
        .extend(["calendars", calendar_id, "events"]);
    Ok(url)
}

#[async_trait]
impl MeetingSource for GoogleCalendarSource {
    async fn list_meetings(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        keyword_hint: &str,
    ) -> Result<Vec<Meeting>> {
        let access_token = self.tokens.access_token().await?;
        let request = self
            .http_client
            .request(Method::GET, self.events_url.clone())
            .bearer_auth(access_token)
            .query(&[
                ("timeMin", time_min.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("timeMax", time_max.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
                ("q", keyword_hint.to_string()),
            ]);

        let response: GoogleEventsResponse = self.http_client.send_json(request).await?;
        let meetings: Vec<Meeting> =
            response.items.into_iter().filter_map(GoogleCalendarEvent::into_meeting).collect();
        debug!(%time_min, %time_max, meetings = meetings.len(), "calendar window listed");
        Ok(meetings)
    }
}

#[derive(Debug, Deserialize)]
struct GoogleEventsResponse {
    #[serde(default)]
    items: Vec<GoogleCalendarEvent>,
}

#[derive(Debug, Deserialize)]
struct GoogleCalendarEvent {
    id: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    start: EventDateTime,
    #[serde(default)]
    attendees: Vec<GoogleAttendee>,
}

#[derive(Debug, Deserialize)]
struct EventDateTime {
    #[serde(rename = "dateTime")]
    date_time: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleAttendee {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    organizer: bool,
}

impl GoogleCalendarEvent {
    fn into_meeting(self) -> Option<Meeting> {
        if self.status.as_deref() == Some("cancelled") {
            return None;
        }
        let Some(start) = self.start.to_utc() else {
            warn!(event_id = %self.id, "event start could not be parsed; skipping");
            return None;
        };
        let attendees = self
            .attendees
            .into_iter()
            .filter_map(|attendee| {
                let email = attendee.email?.trim().to_string();
                (!email.is_empty()).then(|| Attendee::new(email, attendee.organizer))
            })
            .collect();

        Some(Meeting::new(self.id, self.summary.unwrap_or_default(), start, attendees))
    }
}

impl EventDateTime {
    /// Timed events keep their instant; all-day events start at midnight UTC.
    fn to_utc(&self) -> Option<DateTime<Utc>> {
        if let Some(raw) = &self.date_time {
            return DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.with_timezone(&Utc));
        }
        let date = NaiveDate::parse_from_str(self.date.as_deref()?, "%Y-%m-%d").ok()?;
        date.and_hms_opt(0, 0, 0).map(|midnight| midnight.and_utc())
    }
}
