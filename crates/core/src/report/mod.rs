//! Slack report rendering
//!
//! Every free-text value (agent name, meeting title, ticket subject, CSAT
//! comment) passes through [`redact`] and [`escape_mrkdwn`] before it reaches
//! the message. Ticket links are only emitted for hosts inside the configured
//! ticketing domain.

pub mod discussion;
pub mod redact;

use std::fmt::Write as _;

use prepdesk_domain::constants::{
    AGED_TICKETS_SHOWN, CSAT_TICKETS_SHOWN, DEFAULT_TICKETING_DOMAIN, SLA_BREACHES_SHOWN,
};
use prepdesk_domain::{CsatTicket, Meeting, PerformanceSnapshot, SatisfactionScore, Ticket};
use url::Url;

pub use discussion::{discussion_points, DiscussionPoint};
pub use redact::{escape_mrkdwn, preview, redact, truncate};

const SUBJECT_PREVIEW_CHARS: usize = 40;
const COMMENT_PREVIEW_CHARS: usize = 30;

/// Renders snapshots and errors as Slack mrkdwn.
#[derive(Debug, Clone)]
pub struct ReportFormatter {
    ticketing_domain: String,
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_TICKETING_DOMAIN)
    }
}

impl ReportFormatter {
    pub fn new(ticketing_domain: impl Into<String>) -> Self {
        let domain = ticketing_domain.into();
        Self { ticketing_domain: domain.trim().trim_start_matches('.').to_lowercase() }
    }

    /// Full briefing for one agent ahead of `meeting`.
    pub fn format(&self, snapshot: &PerformanceSnapshot, meeting: &Meeting) -> String {
        let mut out = String::new();

        let agent_name = if snapshot.agent.name.trim().is_empty() {
            "Unknown agent".to_string()
        } else {
            clean(&snapshot.agent.name)
        };
        let _ = writeln!(out, ":dart: *1on1 Performance Summary*");
        let _ = writeln!(out, ":bust_in_silhouette: *Agent:* {agent_name}");
        let _ = writeln!(
            out,
            ":date: *Meeting:* {} at {}",
            clean(&meeting.title),
            meeting.scheduled_start.format("%Y-%m-%d %H:%M UTC")
        );

        let _ = writeln!(out, "\n:bar_chart: *Last week*");
        let _ = writeln!(out, "• Total tickets: {}", snapshot.total_tickets);
        let _ = writeln!(out, "• Solved tickets: {}", snapshot.solved_tickets);
        let _ = writeln!(out, "• Internal comments: {}", snapshot.internal_comments);
        let _ = writeln!(out, "• External comments: {}", snapshot.external_comments);

        self.ticket_section(
            &mut out,
            ":rotating_light: *Urgent tickets",
            &snapshot.urgent_tickets,
            snapshot.urgent_tickets.len(),
            "No urgent tickets",
            |ticket| format!(" (status: {})", ticket.status),
        );
        self.ticket_section(
            &mut out,
            ":double_vertical_bar: *On-hold tickets",
            &snapshot.on_hold_tickets,
            snapshot.on_hold_tickets.len(),
            "No tickets on hold",
            |_| String::new(),
        );
        self.ticket_section(
            &mut out,
            ":hourglass: *Tickets older than 2 weeks",
            &snapshot.aged_tickets[..snapshot.aged_tickets.len().min(AGED_TICKETS_SHOWN)],
            snapshot.aged_tickets.len(),
            "No aged tickets",
            |ticket| {
                let priority = ticket.priority.map_or("no", |priority| priority.as_str());
                format!(" ({}, {priority} priority)", ticket.status)
            },
        );

        self.csat_section(
            &mut out,
            ":blush: *Positive CSAT",
            &snapshot.positive_csat,
            "No positive ratings this week",
            "positive ratings",
        );
        self.csat_section(
            &mut out,
            ":pensive: *Negative CSAT",
            &snapshot.negative_csat,
            "No negative ratings this week",
            "negative ratings",
        );

        let _ = writeln!(out, "\n:alarm_clock: *SLA breaches ({})*", snapshot.sla_breaches.len());
        if snapshot.sla_breaches.is_empty() {
            let _ = writeln!(out, "• No SLA breaches");
        }
        for breach in snapshot.sla_breaches.iter().take(SLA_BREACHES_SHOWN) {
            let _ = writeln!(
                out,
                "• {}: {} over SLA ({})",
                self.ticket_label(&breach.ticket),
                breach.display_amount(),
                clean(&breach.metric_name)
            );
        }
        remainder(&mut out, snapshot.sla_breaches.len(), SLA_BREACHES_SHOWN, "breaches");

        let _ = writeln!(out, "\n:bulb: *Discussion points*");
        let points = discussion_points(snapshot);
        if points.is_empty() {
            let _ = writeln!(out, "• Nothing flagged this week");
        }
        for point in points {
            let _ = writeln!(out, "• {} {}", point.emoji(), point.message());
        }

        out
    }

    /// Error notification. The message is redacted like any other field.
    pub fn format_error(&self, message: &str) -> String {
        format!(":x: *PrepDesk error*\n> {}", clean(message))
    }

    /// Agent-facing link to `ticket`, or `None` when its URL is missing,
    /// unparsable or outside the ticketing domain.
    pub fn ticket_link(&self, ticket: &Ticket) -> Option<String> {
        let url = Url::parse(ticket.url.as_deref()?).ok()?;
        let host = url.host_str()?.to_lowercase();
        self.is_ticketing_host(&host)
            .then(|| format!("https://{host}/agent/tickets/{}", ticket.id))
    }

    fn is_ticketing_host(&self, host: &str) -> bool {
        if self.ticketing_domain.is_empty() {
            return false;
        }
        host == self.ticketing_domain
            || host
                .strip_suffix(self.ticketing_domain.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    }

    /// `#ID: subject`, linked when the ticket URL is trusted.
    fn ticket_label(&self, ticket: &Ticket) -> String {
        let subject = clean_preview(ticket.subject_or_default(), SUBJECT_PREVIEW_CHARS);
        let text = format!("#{}: {subject}", ticket.id);
        match self.ticket_link(ticket) {
            Some(link) => format!("<{link}|{text}>"),
            None => text,
        }
    }

    fn ticket_section(
        &self,
        out: &mut String,
        heading: &str,
        shown: &[Ticket],
        total: usize,
        empty: &str,
        detail: impl Fn(&Ticket) -> String,
    ) {
        let _ = writeln!(out, "\n{heading} ({total})*");
        if shown.is_empty() {
            let _ = writeln!(out, "• {empty}");
        }
        for ticket in shown {
            let _ = writeln!(out, "• {}{}", self.ticket_label(ticket), detail(ticket));
        }
        remainder(out, total, shown.len(), "");
    }

    fn csat_section(
        &self,
        out: &mut String,
        heading: &str,
        tickets: &[CsatTicket],
        empty: &str,
        noun: &str,
    ) {
        let _ = writeln!(out, "\n{heading} ({})*", tickets.len());
        if tickets.is_empty() {
            let _ = writeln!(out, "• {empty}");
        }
        for csat in tickets.iter().take(CSAT_TICKETS_SHOWN) {
            let _ = writeln!(
                out,
                "• {} {}",
                score_emoji(csat.rating.score),
                self.ticket_label(&csat.ticket)
            );
            let comment = csat.rating.comment.as_deref().filter(|c| !c.trim().is_empty());
            if let Some(comment) = comment {
                let excerpt = clean_preview(comment, COMMENT_PREVIEW_CHARS);
                let _ = writeln!(out, "    :speech_balloon: \"{excerpt}\"");
            }
        }
        remainder(out, tickets.len(), CSAT_TICKETS_SHOWN, noun);
    }
}

/// Redact, then escape for mrkdwn.
fn clean(text: &str) -> String {
    escape_mrkdwn(&redact(text))
}

/// Redact, shorten, then escape. Shortening before escaping keeps entities
/// intact.
fn clean_preview(text: &str, max_chars: usize) -> String {
    escape_mrkdwn(&preview(&redact(text), max_chars))
}

fn remainder(out: &mut String, total: usize, shown: usize, noun: &str) {
    if total > shown {
        let more = total - shown;
        if noun.is_empty() {
            let _ = writeln!(out, "• ... and {more} more");
        } else {
            let _ = writeln!(out, "• ... and {more} more {noun}");
        }
    }
}

const fn score_emoji(score: SatisfactionScore) -> &'static str {
    match score {
        SatisfactionScore::Great => ":star:",
        SatisfactionScore::Good => ":+1:",
        SatisfactionScore::Bad => ":-1:",
        _ => ":neutral_face:",
    }
}
