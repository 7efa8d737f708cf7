//! Conversions from external infrastructure errors into domain errors.
//!
//! Messages built here end up in logs and chat notifications, so they carry
//! status codes and error classes only: never URLs, bodies or credentials.

use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use prepdesk_domain::PrepDeskError;
use reqwest::{Error as HttpError, StatusCode};
use serde_json::Error as JsonError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub PrepDeskError);

impl From<InfraError> for PrepDeskError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<PrepDeskError> for InfraError {
    fn from(value: PrepDeskError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoPrepDeskError {
    fn into_prepdesk(self) -> PrepDeskError;
}

/// Map a non-success HTTP status to the domain error class.
pub fn status_error(status: StatusCode) -> PrepDeskError {
    let code = status.as_u16();
    let message = format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

    match code {
        401 | 403 => PrepDeskError::Auth(message),
        404 => PrepDeskError::NotFound(message),
        429 => PrepDeskError::Network(message),
        400..=499 => PrepDeskError::InvalidInput(message),
        _ => PrepDeskError::Network(message),
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → PrepDeskError */
/* -------------------------------------------------------------------------- */

impl IntoPrepDeskError for HttpError {
    fn into_prepdesk(self) -> PrepDeskError {
        if self.is_timeout() {
            return PrepDeskError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return PrepDeskError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return status_error(status);
        }

        if self.is_decode() {
            return PrepDeskError::Network("HTTP response body could not be decoded".into());
        }

        // Request URLs can carry query values such as email addresses.
        PrepDeskError::Network(self.without_url().to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_prepdesk())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → PrepDeskError */
/* -------------------------------------------------------------------------- */

impl IntoPrepDeskError for JsonError {
    fn into_prepdesk(self) -> PrepDeskError {
        // Only the position: the message may quote payload content.
        PrepDeskError::InvalidInput(format!(
            "malformed JSON ({:?}) at line {} column {}",
            self.classify(),
            self.line(),
            self.column()
        ))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_prepdesk())
    }
}

/* -------------------------------------------------------------------------- */
/* jsonwebtoken::Error → PrepDeskError */
/* -------------------------------------------------------------------------- */

impl IntoPrepDeskError for JwtError {
    fn into_prepdesk(self) -> PrepDeskError {
        match self.kind() {
            JwtErrorKind::InvalidRsaKey(_) | JwtErrorKind::InvalidKeyFormat => {
                PrepDeskError::Config("service account private key is not a valid RSA key".into())
            }
            _ => PrepDeskError::Auth("failed to sign service account assertion".into()),
        }
    }
}

impl From<JwtError> for InfraError {
    fn from(value: JwtError) -> Self {
        InfraError(value.into_prepdesk())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
