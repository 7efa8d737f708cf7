//! One notification pass and the collaborator self-test
//!
//! A pass runs `Scan -> [ResolveAgent -> Aggregate -> Format -> Notify]*`
//! for every meeting the scanner detects. Collaborators are injected
//! already initialized; an initialization failure is carried instead of a
//! collaborator and reported through messaging when messaging itself is up.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use prepdesk_domain::constants::{
    DEFAULT_FAN_OUT_CONCURRENCY, DEFAULT_TICKETING_DOMAIN, SELF_TEST_LOOKAHEAD_HOURS,
};
use prepdesk_domain::{Config, PrepDeskError, Result, ScanConfig};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::metrics::MetricsAggregator;
use crate::ports::{MeetingSource, NotificationSink, TicketingApi};
use crate::report::ReportFormatter;
use crate::scanner::{DetectedMeeting, ScheduleScanner};
use crate::tickets::TicketSource;

const SELF_TEST_MESSAGE: &str = ":white_check_mark: PrepDesk self-test: messaging is working.";

/// An initialized collaborator, or the reason it could not be initialized.
pub enum Collaborator<T: ?Sized> {
    Ready(Arc<T>),
    Failed(PrepDeskError),
}

impl<T: ?Sized> Collaborator<T> {
    pub fn from_result(result: Result<Arc<T>>) -> Self {
        match result {
            Ok(inner) => Self::Ready(inner),
            Err(err) => Self::Failed(err),
        }
    }

    pub fn ready(&self) -> Option<&Arc<T>> {
        match self {
            Self::Ready(inner) => Some(inner),
            Self::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&PrepDeskError> {
        match self {
            Self::Ready(_) => None,
            Self::Failed(err) => Some(err),
        }
    }
}

impl<T: ?Sized> Clone for Collaborator<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Ready(inner) => Self::Ready(Arc::clone(inner)),
            Self::Failed(err) => Self::Failed(err.clone()),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Collaborator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(_) => f.write_str("Ready"),
            Self::Failed(err) => f.debug_tuple("Failed").field(err).finish(),
        }
    }
}

/// The three external services a pass depends on.
#[derive(Debug, Clone)]
pub struct Collaborators {
    pub calendar: Collaborator<dyn MeetingSource>,
    pub ticketing: Collaborator<dyn TicketingApi>,
    pub messaging: Collaborator<dyn NotificationSink>,
}

impl Collaborators {
    /// Names and errors of the collaborators that failed to initialize.
    pub fn failures(&self) -> Vec<(&'static str, &PrepDeskError)> {
        [
            ("calendar", self.calendar.failure()),
            ("ticketing", self.ticketing.failure()),
            ("messaging", self.messaging.failure()),
        ]
        .into_iter()
        .filter_map(|(name, failure)| failure.map(|err| (name, err)))
        .collect()
    }
}

/// Non-collaborator inputs of a pass.
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub channel_id: String,
    pub scan: ScanConfig,
    pub ticketing_domain: String,
    pub fan_out_concurrency: usize,
}

impl OrchestratorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            channel_id: config.slack.channel_id.clone(),
            scan: config.scan.clone(),
            ticketing_domain: config.zendesk.ticketing_domain.clone(),
            fan_out_concurrency: config.http.fan_out_concurrency,
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            channel_id: String::new(),
            scan: ScanConfig::default(),
            ticketing_domain: DEFAULT_TICKETING_DOMAIN.to_string(),
            fan_out_concurrency: DEFAULT_FAN_OUT_CONCURRENCY,
        }
    }
}

/// Outcome of [`Orchestrator::run_check`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// Collaborators that failed to initialize; the pass did not run.
    pub collaborator_failures: Vec<String>,
    /// Every calendar sub-window failed.
    pub scan_failed: bool,
    pub meetings_detected: usize,
    pub unresolved_meetings: usize,
    pub missing_snapshots: usize,
    /// Performance briefings delivered; error notifications are not counted.
    pub reports_sent: usize,
    pub delivery_failures: usize,
}

impl PassReport {
    /// Delivery failures and missing snapshots do not fail a pass.
    pub fn is_success(&self) -> bool {
        self.collaborator_failures.is_empty() && !self.scan_failed
    }
}

/// Result of one self-test probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
    Passed { detail: String },
    Failed { error: String },
}

impl CheckOutcome {
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed { .. })
    }

    fn from_error(err: &PrepDeskError) -> Self {
        Self::Failed { error: err.to_string() }
    }
}

/// Outcome of [`Orchestrator::self_test`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelfTestReport {
    pub calendar: CheckOutcome,
    pub ticketing: CheckOutcome,
    pub messaging: CheckOutcome,
}

impl SelfTestReport {
    pub const fn is_success(&self) -> bool {
        self.calendar.is_passed() && self.ticketing.is_passed() && self.messaging.is_passed()
    }
}

/// Drives notification passes.
pub struct Orchestrator {
    collaborators: Collaborators,
    settings: OrchestratorSettings,
    formatter: ReportFormatter,
}

impl Orchestrator {
    pub fn new(collaborators: Collaborators, settings: OrchestratorSettings) -> Self {
        let formatter = ReportFormatter::new(settings.ticketing_domain.clone());
        Self { collaborators, settings, formatter }
    }

    /// Run one pass at `now`.
    ///
    /// Callers must not run passes concurrently; nothing is remembered
    /// between passes.
    #[instrument(skip(self))]
    pub async fn run_check(&self, now: DateTime<Utc>) -> PassReport {
        let (Collaborator::Ready(calendar), Collaborator::Ready(ticketing), Collaborator::Ready(_)) = (
            &self.collaborators.calendar,
            &self.collaborators.ticketing,
            &self.collaborators.messaging,
        ) else {
            return self.report_initialization_failure().await;
        };

        let scanner = ScheduleScanner::new(Arc::clone(calendar), &self.settings.scan);
        let outcome = scanner.scan(now).await;
        let mut report = PassReport {
            meetings_detected: outcome.meetings.len(),
            unresolved_meetings: outcome.unresolved.len(),
            ..PassReport::default()
        };

        if outcome.is_failed() {
            error!(windows = outcome.windows_queried, "every calendar query failed");
            report.scan_failed = true;
            let text = self.formatter.format_error("Calendar lookup failed for every scan window.");
            self.deliver(&text, &mut report).await;
            return report;
        }

        let aggregator = MetricsAggregator::new(TicketSource::with_concurrency(
            Arc::clone(ticketing),
            self.settings.fan_out_concurrency,
        ));

        for detected in &outcome.meetings {
            self.process_meeting(&aggregator, detected, now, &mut report).await;
        }

        info!(
            detected = report.meetings_detected,
            sent = report.reports_sent,
            missing = report.missing_snapshots,
            delivery_failures = report.delivery_failures,
            "pass completed"
        );
        report
    }

    /// Probe every collaborator once. Passes only if all three succeed.
    #[instrument(skip(self))]
    pub async fn self_test(&self, now: DateTime<Utc>) -> SelfTestReport {
        let calendar = match &self.collaborators.calendar {
            Collaborator::Failed(err) => CheckOutcome::from_error(err),
            Collaborator::Ready(source) => {
                let scanner = ScheduleScanner::new(Arc::clone(source), &self.settings.scan);
                let lookahead = Duration::hours(SELF_TEST_LOOKAHEAD_HOURS);
                match scanner.upcoming_meetings(now, lookahead).await {
                    Ok(meetings) => {
                        for meeting in &meetings {
                            info!(
                                meeting_id = %meeting.id,
                                start = %meeting.scheduled_start,
                                "upcoming 1on1"
                            );
                        }
                        CheckOutcome::Passed {
                            detail: format!(
                                "{} 1on1 meetings in the next {SELF_TEST_LOOKAHEAD_HOURS} hours",
                                meetings.len()
                            ),
                        }
                    }
                    Err(err) => CheckOutcome::from_error(&err),
                }
            }
        };

        let ticketing = match &self.collaborators.ticketing {
            Collaborator::Failed(err) => CheckOutcome::from_error(err),
            Collaborator::Ready(api) => match api.check_connection().await {
                Ok(()) => CheckOutcome::Passed { detail: "connection verified".to_string() },
                Err(err) => CheckOutcome::from_error(&err),
            },
        };

        let messaging = match &self.collaborators.messaging {
            Collaborator::Failed(err) => CheckOutcome::from_error(err),
            Collaborator::Ready(sink) => {
                match sink.post_message(&self.settings.channel_id, SELF_TEST_MESSAGE).await {
                    Ok(()) => CheckOutcome::Passed { detail: "test message posted".to_string() },
                    Err(err) => CheckOutcome::from_error(&err),
                }
            }
        };

        let report = SelfTestReport { calendar, ticketing, messaging };
        info!(success = report.is_success(), "self-test completed");
        report
    }

    async fn process_meeting(
        &self,
        aggregator: &MetricsAggregator,
        detected: &DetectedMeeting,
        now: DateTime<Utc>,
        report: &mut PassReport,
    ) {
        let meeting = &detected.meeting;
        let Some(agent_email) = detected.agent_email() else {
            warn!(meeting_id = %meeting.id, "meeting has no agent, skipping");
            return;
        };

        let Some(snapshot) = aggregator.build_snapshot(agent_email, now).await else {
            warn!(meeting_id = %meeting.id, "no performance snapshot for meeting");
            report.missing_snapshots += 1;
            let text = self.formatter.format_error(&format!(
                "Unable to retrieve performance metrics for {} ahead of the upcoming 1on1.",
                agent_handle(agent_email)
            ));
            self.deliver(&text, report).await;
            return;
        };

        let text = self.formatter.format(&snapshot, meeting);
        if self.deliver(&text, report).await {
            report.reports_sent += 1;
        }
    }

    async fn report_initialization_failure(&self) -> PassReport {
        let failures = self.collaborators.failures();
        for (name, err) in &failures {
            error!(collaborator = *name, error = err.label(), "collaborator failed to initialize");
        }

        let names: Vec<String> = failures.iter().map(|(name, _)| (*name).to_string()).collect();
        let mut report = PassReport { collaborator_failures: names, ..PassReport::default() };

        if self.collaborators.messaging.ready().is_some() {
            let text = self.formatter.format_error(&format!(
                "Initialization failed for: {}.",
                report.collaborator_failures.join(", ")
            ));
            self.deliver(&text, &mut report).await;
        }
        report
    }

    /// Post `text`; failures are logged and counted. Returns whether the
    /// message was delivered.
    async fn deliver(&self, text: &str, report: &mut PassReport) -> bool {
        let Some(sink) = self.collaborators.messaging.ready() else {
            report.delivery_failures += 1;
            return false;
        };

        match sink.post_message(&self.settings.channel_id, text).await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = err.label(), "message delivery failed");
                report.delivery_failures += 1;
                false
            }
        }
    }
}

/// Local part of an email: names the agent without an address the report
/// redaction would mask.
fn agent_handle(email: &str) -> &str {
    email.split('@').next().filter(|local| !local.is_empty()).unwrap_or("the agent")
}
