//! Application constants
//!
//! Centralized location for the domain-level constants used throughout the
//! application.

// Meeting detection
pub const MEETING_KEYWORD: &str = "1on1";
pub const SCAN_MIN_OFFSET_MINUTES: i64 = 25;
pub const SCAN_MAX_OFFSET_MINUTES: i64 = 35;
pub const SCAN_TOLERANCE_MINUTES: i64 = 2;
pub const SELF_TEST_LOOKAHEAD_HOURS: i64 = 24;

// Ticket windows (day granularity)
pub const RECENT_WINDOW_DAYS: i64 = 7;
pub const AGED_TICKET_DAYS: i64 = 14;

// Discussion point thresholds
pub const SOLVED_RATIO_THRESHOLD: f64 = 0.7;
pub const URGENT_TICKET_THRESHOLD: usize = 3;
pub const INTERNAL_COMMENT_RATIO: usize = 2;

// Report limits
pub const AGED_TICKETS_SHOWN: usize = 5;
pub const CSAT_TICKETS_SHOWN: usize = 3;
pub const SLA_BREACHES_SHOWN: usize = 5;
pub const MAX_FIELD_LENGTH: usize = 200;
pub const FIELD_TRUNCATE_SUFFIX: &str = "...";
pub const EMAIL_PLACEHOLDER: &str = "[EMAIL]";
pub const IP_PLACEHOLDER: &str = "[IP]";

// Transport defaults
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HTTP_MAX_ATTEMPTS: usize = 3;
pub const DEFAULT_FAN_OUT_CONCURRENCY: usize = 4;
pub const DEFAULT_TICKETING_DOMAIN: &str = "zendesk.com";
pub const USER_AGENT: &str = concat!("PrepDesk/", env!("CARGO_PKG_VERSION"));
