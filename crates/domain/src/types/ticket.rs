//! Ticketing records as read from the ticketing system
//!
//! The ticketing system owns these records; PrepDesk only reads snapshots of
//! them. Field names follow the Zendesk wire format so adapters can
//! deserialize straight into these types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_wire_value_conversions;

/// Support agent resolved from the ticketing user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: u64,
    pub name: String,
    pub email: String,
}

/// Ticket lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    New,
    Open,
    Pending,
    Hold,
    Solved,
    Closed,
    #[serde(other)]
    Unknown,
}

impl_wire_value_conversions!(TicketStatus {
    New => "new",
    Open => "open",
    Pending => "pending",
    Hold => "hold",
    Solved => "solved",
    Closed => "closed",
    Unknown => "unknown",
});

impl TicketStatus {
    /// True for solved and closed tickets.
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Solved | Self::Closed)
    }
}

/// Ticket priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    Low,
    Normal,
    High,
    Urgent,
    #[serde(other)]
    Unknown,
}

impl_wire_value_conversions!(TicketPriority {
    Low => "low",
    Normal => "normal",
    High => "high",
    Urgent => "urgent",
    Unknown => "unknown",
});

fn default_status() -> TicketStatus {
    TicketStatus::Unknown
}

/// Snapshot of a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u64,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default = "default_status")]
    pub status: TicketStatus,
    #[serde(default)]
    pub priority: Option<TicketPriority>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// API URL of the ticket as reported by the ticketing system.
    #[serde(default)]
    pub url: Option<String>,
}

impl Ticket {
    /// Subject, or a placeholder for tickets without one.
    pub fn subject_or_default(&self) -> &str {
        self.subject.as_deref().filter(|s| !s.trim().is_empty()).unwrap_or("No subject")
    }

    pub fn is_urgent(&self) -> bool {
        self.priority == Some(TicketPriority::Urgent)
    }

    pub fn is_on_hold(&self) -> bool {
        self.status == TicketStatus::Hold
    }

    pub fn is_solved(&self) -> bool {
        self.status == TicketStatus::Solved
    }
}

/// Who can see a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentVisibility {
    Public,
    Internal,
}

impl_wire_value_conversions!(CommentVisibility {
    Public => "public",
    Internal => "internal",
});

/// Ticket comment, reduced to what comment accounting needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub ticket_id: u64,
    pub author_id: u64,
    pub visibility: CommentVisibility,
}

/// Customer satisfaction score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SatisfactionScore {
    Good,
    Great,
    Bad,
    NotGood,
    Offered,
    Unoffered,
    #[serde(other)]
    Unknown,
}

impl_wire_value_conversions!(SatisfactionScore {
    Good => "good",
    Great => "great",
    Bad => "bad",
    NotGood => "not_good",
    Offered => "offered",
    Unoffered => "unoffered",
    Unknown => "unknown",
});

impl SatisfactionScore {
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::Good | Self::Great)
    }

    pub const fn is_negative(self) -> bool {
        matches!(self, Self::Bad | Self::NotGood)
    }
}

/// Which side of the CSAT scale a view selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CsatPolarity {
    Positive,
    Negative,
}

impl CsatPolarity {
    pub const fn matches(self, score: SatisfactionScore) -> bool {
        match self {
            Self::Positive => score.is_positive(),
            Self::Negative => score.is_negative(),
        }
    }
}

/// Satisfaction rating attached to a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SatisfactionRating {
    pub ticket_id: u64,
    pub score: SatisfactionScore,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Solved ticket together with its rating.
#[derive(Debug, Clone, PartialEq)]
pub struct CsatTicket {
    pub ticket: Ticket,
    pub rating: SatisfactionRating,
}

/// SLA policy applied to a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlaPolicy {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub policy_metrics: Vec<SlaPolicyMetric>,
}

/// One measured target of an SLA policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlaPolicyMetric {
    #[serde(default)]
    pub metric: Option<String>,
    #[serde(default)]
    pub breach: bool,
    /// Breach amount as reported by the API. Units are not confirmed; it is
    /// read as minutes.
    #[serde(default)]
    pub business_hours: Option<f64>,
}

/// First breached SLA metric of a ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct SlaBreach {
    pub ticket: Ticket,
    pub metric_name: String,
    pub breach_minutes: i64,
}

impl SlaBreach {
    /// Build a breach record from a breached policy metric.
    ///
    /// `business_hours` is stored as minutes without unit conversion.
    pub fn from_metric(ticket: Ticket, metric: &SlaPolicyMetric) -> Option<Self> {
        if !metric.breach {
            return None;
        }
        let amount = metric.business_hours?;
        #[allow(clippy::cast_possible_truncation)]
        let breach_minutes = if amount.is_finite() { amount.floor() as i64 } else { 0 };
        Some(Self {
            ticket,
            metric_name: metric.metric.clone().unwrap_or_else(|| "unknown".to_string()),
            breach_minutes,
        })
    }

    /// Hours rounded to one decimal when the breach exceeds an hour, else 0.
    #[allow(clippy::cast_precision_loss)]
    pub fn breach_hours(&self) -> f64 {
        if self.breach_minutes > 60 {
            (self.breach_minutes as f64 / 60.0 * 10.0).round() / 10.0
        } else {
            0.0
        }
    }

    /// Human readable amount: hours when over an hour, minutes otherwise.
    pub fn display_amount(&self) -> String {
        let hours = self.breach_hours();
        if hours > 0.0 {
            format!("{hours}h")
        } else {
            format!("{}m", self.breach_minutes)
        }
    }
}
