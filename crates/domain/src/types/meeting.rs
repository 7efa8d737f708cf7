//! Calendar meetings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Meeting attendee as listed by the calendar provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub email: String,
    #[serde(default)]
    pub organizer: bool,
}

impl Attendee {
    pub fn new(email: impl Into<String>, organizer: bool) -> Self {
        Self { email: email.into(), organizer }
    }
}

/// Scheduled meeting. Lives only for the duration of one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: String,
    pub title: String,
    pub scheduled_start: DateTime<Utc>,
    pub attendees: Vec<Attendee>,
    /// First attendee not flagged as organizer.
    pub agent_email: Option<String>,
}

impl Meeting {
    /// Build a meeting and resolve its agent from the attendee list.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        scheduled_start: DateTime<Utc>,
        attendees: Vec<Attendee>,
    ) -> Self {
        let agent_email = resolve_agent_email(&attendees);
        Self { id: id.into(), title: title.into(), scheduled_start, attendees, agent_email }
    }

    /// Case-insensitive title keyword check.
    pub fn title_contains(&self, keyword: &str) -> bool {
        self.title.to_lowercase().contains(&keyword.to_lowercase())
    }
}

/// The agent of a 1-on-1 is the first attendee who is not the organizer.
///
/// Returns `None` when every attendee is flagged organizer or the list is
/// empty.
pub fn resolve_agent_email(attendees: &[Attendee]) -> Option<String> {
    attendees
        .iter()
        .find(|attendee| !attendee.organizer)
        .map(|attendee| attendee.email.trim().to_string())
        .filter(|email| !email.is_empty())
}
