//! Google Calendar adapter and credential sourcing

pub mod credentials;
pub mod google;

pub use credentials::{
    AccessTokenProvider, AuthorizedUserProvider, AuthorizedUserToken, GoogleCredentials,
    ServiceAccountKey, ServiceAccountProvider,
};
pub use google::GoogleCalendarSource;
