//! External service integrations

pub mod calendar;
pub mod slack;
pub mod zendesk;

pub use calendar::{AccessTokenProvider, GoogleCalendarSource, GoogleCredentials};
pub use slack::SlackNotifier;
pub use zendesk::ZendeskClient;
