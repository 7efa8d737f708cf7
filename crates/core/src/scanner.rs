//! Upcoming 1-on-1 detection
//!
//! The scanner runs on a fixed external schedule, so instead of one wide
//! query it probes a sliding set of narrow sub-windows ahead of `now`. The
//! sub-windows overlap; results are merged and deduplicated by meeting id.

use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use prepdesk_domain::{Meeting, Result, ScanConfig};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::ports::MeetingSource;

/// Offsets (minutes ahead of now) and the tolerance around each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    pub min_offset_minutes: i64,
    pub max_offset_minutes: i64,
    pub tolerance_minutes: i64,
}

impl ScanWindow {
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            min_offset_minutes: config.min_offset_minutes,
            max_offset_minutes: config.max_offset_minutes,
            tolerance_minutes: config.tolerance_minutes.max(0),
        }
    }

    /// Integer offsets probed, ascending. Empty if the bounds are inverted.
    pub fn offsets(&self) -> RangeInclusive<i64> {
        self.min_offset_minutes..=self.max_offset_minutes
    }

    /// `[now + offset - tolerance, now + offset + tolerance]`
    pub fn bounds(&self, now: DateTime<Utc>, offset_minutes: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let center = now + Duration::minutes(offset_minutes);
        let tolerance = Duration::minutes(self.tolerance_minutes);
        (center - tolerance, center + tolerance)
    }
}

impl Default for ScanWindow {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}

/// A meeting found by a scan, with the first offset that surfaced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedMeeting {
    pub meeting: Meeting,
    pub offset_minutes: i64,
}

impl DetectedMeeting {
    pub fn agent_email(&self) -> Option<&str> {
        self.meeting.agent_email.as_deref()
    }
}

/// Result of one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanOutcome {
    /// Meetings with a resolved agent, in detection order.
    pub meetings: Vec<DetectedMeeting>,
    /// Meetings where every attendee is flagged organizer.
    pub unresolved: Vec<DetectedMeeting>,
    pub windows_queried: usize,
    pub windows_failed: usize,
}

impl ScanOutcome {
    /// True when sub-windows were queried and every one of them failed.
    pub const fn is_failed(&self) -> bool {
        self.windows_queried > 0 && self.windows_failed == self.windows_queried
    }
}

/// Merge per-offset query results.
///
/// Keeps meetings whose title contains `keyword` (case-insensitive). The
/// first occurrence of an id wins; order is the order of `windows`, then
/// provider order within a window.
pub fn merge_windows(windows: Vec<(i64, Vec<Meeting>)>, keyword: &str) -> Vec<DetectedMeeting> {
    let mut seen = HashSet::new();
    let mut detected = Vec::new();

    for (offset_minutes, meetings) in windows {
        for meeting in meetings {
            if !meeting.title_contains(keyword) || !seen.insert(meeting.id.clone()) {
                continue;
            }
            detected.push(DetectedMeeting { meeting, offset_minutes });
        }
    }
    detected
}

/// Probes the calendar for 1-on-1s about to start.
pub struct ScheduleScanner {
    source: Arc<dyn MeetingSource>,
    window: ScanWindow,
    keyword: String,
}

impl ScheduleScanner {
    pub fn new(source: Arc<dyn MeetingSource>, config: &ScanConfig) -> Self {
        Self { source, window: ScanWindow::from_config(config), keyword: config.keyword.clone() }
    }

    /// Scan every sub-window ahead of `now`.
    ///
    /// A failing sub-window is logged and counted but does not stop the
    /// scan. The outcome holds no memory of earlier scans, so a meeting seen
    /// by two consecutive invocations is reported twice.
    #[instrument(skip(self))]
    pub async fn scan(&self, now: DateTime<Utc>) -> ScanOutcome {
        let mut windows = Vec::new();
        let mut windows_queried = 0;
        let mut windows_failed = 0;

        for offset in self.window.offsets() {
            let (time_min, time_max) = self.window.bounds(now, offset);
            windows_queried += 1;

            match self.source.list_meetings(time_min, time_max, &self.keyword).await {
                Ok(meetings) => {
                    let in_window: Vec<Meeting> = meetings
                        .into_iter()
                        .filter(|meeting| {
                            meeting.scheduled_start >= time_min && meeting.scheduled_start <= time_max
                        })
                        .collect();
                    windows.push((offset, in_window));
                }
                Err(err) => {
                    warn!(offset, error = err.label(), "calendar sub-window query failed");
                    windows_failed += 1;
                }
            }
        }

        let (meetings, unresolved): (Vec<_>, Vec<_>) = merge_windows(windows, &self.keyword)
            .into_iter()
            .partition(|detected| detected.agent_email().is_some());

        for detected in &unresolved {
            warn!(
                meeting_id = %detected.meeting.id,
                "no non-organizer attendee, meeting cannot be attributed to an agent"
            );
        }

        debug!(
            detected = meetings.len(),
            unresolved = unresolved.len(),
            windows_queried,
            windows_failed,
            "scan completed"
        );

        ScanOutcome { meetings, unresolved, windows_queried, windows_failed }
    }

    /// Keyword meetings starting within `lookahead` of `now`.
    pub async fn upcoming_meetings(
        &self,
        now: DateTime<Utc>,
        lookahead: Duration,
    ) -> Result<Vec<Meeting>> {
        let meetings = self.source.list_meetings(now, now + lookahead, &self.keyword).await?;
        Ok(meetings.into_iter().filter(|meeting| meeting.title_contains(&self.keyword)).collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use prepdesk_domain::Attendee;

    use super::*;

    fn meeting(id: &str, title: &str) -> Meeting {
        let start = Utc.with_ymd_and_hms(2025, 3, 4, 15, 0, 0).unwrap();
        Meeting::new(id, title, start, vec![Attendee::new("agent@x.io", false)])
    }

    #[test]
    fn default_window_covers_eleven_offsets() {
        let window = ScanWindow::default();
        assert_eq!(window.offsets().count(), 11);
        assert_eq!(window.offsets().next(), Some(25));
    }

    #[test]
    fn bounds_surround_the_offset() {
        let now = Utc.with_ymd_and_hms(2025, 3, 4, 14, 30, 0).unwrap();
        let (min, max) = ScanWindow::default().bounds(now, 30);
        assert_eq!(min, Utc.with_ymd_and_hms(2025, 3, 4, 14, 58, 0).unwrap());
        assert_eq!(max, Utc.with_ymd_and_hms(2025, 3, 4, 15, 2, 0).unwrap());
    }

    #[test]
    fn merge_keeps_first_occurrence() {
        let windows = vec![
            (25, vec![meeting("a", "1on1 Ana")]),
            (26, vec![meeting("b", "1ON1 Bo"), meeting("a", "1on1 Ana (moved)")]),
        ];

        let merged = merge_windows(windows, "1on1");
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].meeting.title, "1on1 Ana");
        assert_eq!(merged[0].offset_minutes, 25);
        assert_eq!(merged[1].meeting.id, "b");
    }

    #[test]
    fn merge_rechecks_keyword() {
        let windows = vec![(30, vec![meeting("a", "Team sync"), meeting("b", "Weekly 1on1 Sync")])];
        let merged = merge_windows(windows, "1on1");
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].meeting.id, "b");
    }

    #[test]
    fn outcome_failure_requires_all_windows_failed() {
        let partial = ScanOutcome { windows_queried: 11, windows_failed: 10, ..ScanOutcome::default() };
        assert!(!partial.is_failed());

        let total = ScanOutcome { windows_queried: 11, windows_failed: 11, ..ScanOutcome::default() };
        assert!(total.is_failed());

        assert!(!ScanOutcome::default().is_failed());
    }
}
