//! Ticket search query composition
//!
//! Queries are scoped to one assignee and bounded by a calendar date (day
//! granularity, never an instant), e.g.
//! `assignee:42 created>=2025-03-01 type:ticket`.

use std::fmt;

use chrono::NaiveDate;
use prepdesk_domain::TicketStatus;

/// Timestamp a date bound applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Created,
    Updated,
}

impl DateField {
    const fn keyword(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateBound {
    OnOrAfter(NaiveDate),
    OnOrBefore(NaiveDate),
}

/// Status restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    /// `status:<s>`
    Is(TicketStatus),
    /// `status<<s>`: every status that precedes `s` in the lifecycle.
    Before(TicketStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Search query for tickets assigned to one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketQuery {
    assignee_id: u64,
    date: Option<(DateField, DateBound)>,
    status: Option<StatusFilter>,
    sort: Option<(SortField, SortOrder)>,
}

impl TicketQuery {
    /// Tickets assigned to `assignee_id`.
    pub const fn assigned_to(assignee_id: u64) -> Self {
        Self { assignee_id, date: None, status: None, sort: None }
    }

    /// Restrict to `field >= date`.
    #[must_use]
    pub fn since(mut self, field: DateField, date: NaiveDate) -> Self {
        self.date = Some((field, DateBound::OnOrAfter(date)));
        self
    }

    /// Restrict to `field <= date`.
    #[must_use]
    pub fn until(mut self, field: DateField, date: NaiveDate) -> Self {
        self.date = Some((field, DateBound::OnOrBefore(date)));
        self
    }

    #[must_use]
    pub fn with_status(mut self, filter: StatusFilter) -> Self {
        self.status = Some(filter);
        self
    }

    #[must_use]
    pub fn sorted_by(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort = Some((field, order));
        self
    }

    pub const fn assignee_id(&self) -> u64 {
        self.assignee_id
    }

    /// `(sort_by, sort_order)` request parameters, if sorting was requested.
    pub fn sort_params(&self) -> Option<(&'static str, &'static str)> {
        self.sort.map(|(field, order)| (field.as_str(), order.as_str()))
    }

    /// Value of the `query` search parameter.
    pub fn search_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TicketQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "assignee:{}", self.assignee_id)?;
        if let Some((field, bound)) = self.date {
            match bound {
                DateBound::OnOrAfter(date) => {
                    write!(f, " {}>={}", field.keyword(), date.format("%Y-%m-%d"))?;
                }
                DateBound::OnOrBefore(date) => {
                    write!(f, " {}<={}", field.keyword(), date.format("%Y-%m-%d"))?;
                }
            }
        }
        match self.status {
            Some(StatusFilter::Is(status)) => write!(f, " status:{status}")?,
            Some(StatusFilter::Before(status)) => write!(f, " status<{status}")?,
            None => {}
        }
        f.write_str(" type:ticket")
    }
}
