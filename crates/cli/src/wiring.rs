//! Builds the three collaborators from configuration.
//!
//! Each collaborator is built independently so one failing integration does
//! not prevent the others from reporting it.

use std::sync::Arc;

use prepdesk_core::{Collaborator, Collaborators, MeetingSource, NotificationSink, TicketingApi};
use prepdesk_domain::Config;
use prepdesk_infra::{GoogleCalendarSource, SlackNotifier, ZendeskClient};
use tracing::{error, info};

pub fn collaborators(config: &Config) -> Collaborators {
    let calendar = Collaborator::from_result(
        GoogleCalendarSource::from_env(&config.calendar, &config.http)
            .map(|source| Arc::new(source) as Arc<dyn MeetingSource>),
    );
    let ticketing = Collaborator::from_result(
        ZendeskClient::new(&config.zendesk, &config.http)
            .map(|client| Arc::new(client) as Arc<dyn TicketingApi>),
    );
    let messaging = Collaborator::from_result(
        SlackNotifier::new(&config.slack, &config.http)
            .map(|notifier| Arc::new(notifier) as Arc<dyn NotificationSink>),
    );

    let collaborators = Collaborators { calendar, ticketing, messaging };
    let failures = collaborators.failures();
    if failures.is_empty() {
        info!("all collaborators initialized");
    }
    for (name, err) in failures {
        error!(collaborator = name, error = err.label(), "collaborator failed to initialize");
    }
    collaborators
}
