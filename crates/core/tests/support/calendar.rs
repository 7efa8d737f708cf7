use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use prepdesk_core::MeetingSource;
use prepdesk_domain::{Meeting, PrepDeskError, Result as DomainResult};

/// In-memory mock for `MeetingSource`.
///
/// Returns every stored meeting whose start falls inside the requested
/// window, ignoring the keyword hint like a provider doing loose matching.
/// Windows containing one of `failing_instants` return a network error.
#[derive(Default, Clone)]
pub struct MockMeetingSource {
    meetings: Arc<Vec<Meeting>>,
    failing_instants: Arc<Vec<DateTime<Utc>>>,
    fail_all: bool,
    queries: Arc<Mutex<Vec<(DateTime<Utc>, DateTime<Utc>)>>>,
}

impl MockMeetingSource {
    /// Create a new mock seeded with the provided meetings.
    pub fn new(meetings: Vec<Meeting>) -> Self {
        Self { meetings: Arc::new(meetings), ..Self::default() }
    }

    /// Every query fails.
    pub fn failing() -> Self {
        Self { fail_all: true, ..Self::default() }
    }

    /// Queries whose window contains `instant` fail.
    pub fn failing_at(mut self, instant: DateTime<Utc>) -> Self {
        Arc::make_mut(&mut self.failing_instants).push(instant);
        self
    }

    /// Windows queried so far, in order.
    pub fn queries(&self) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl MeetingSource for MockMeetingSource {
    async fn list_meetings(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        _keyword_hint: &str,
    ) -> DomainResult<Vec<Meeting>> {
        self.queries.lock().unwrap().push((time_min, time_max));

        let fails = self.fail_all
            || self.failing_instants.iter().any(|instant| *instant >= time_min && *instant <= time_max);
        if fails {
            return Err(PrepDeskError::Network("calendar unavailable".into()));
        }

        Ok(self
            .meetings
            .iter()
            .filter(|meeting| meeting.scheduled_start >= time_min && meeting.scheduled_start <= time_max)
            .cloned()
            .collect())
    }
}
