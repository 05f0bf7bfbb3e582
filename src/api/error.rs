//! Service error types for the remote trivia API.

use derive_more::{Display, Error};
use tracing::instrument;

/// Classification of a failed service call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ServiceErrorKind {
    /// The service could not be reached.
    #[display("network failure")]
    Network,
    /// The request did not complete in time.
    #[display("timeout")]
    Timeout,
    /// The service answered with a non-success status.
    #[display("HTTP status {_0}")]
    Status(u16),
    /// The bearer token was missing, expired or rejected.
    #[display("unauthorized")]
    Unauthorized,
    /// The response body did not match the expected schema.
    #[display("malformed response")]
    MalformedResponse,
}

/// Error returned by every boundary client, with caller location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Service error ({}): {} at {}:{}", kind, message, file, line)]
pub struct ServiceError {
    /// What went wrong.
    pub kind: ServiceErrorKind,
    /// Human readable detail, possibly taken from the response body.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ServiceError {
    /// Creates a new service error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Shorthand for a [`ServiceErrorKind::MalformedResponse`] error.
    #[track_caller]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::MalformedResponse, message)
    }

    /// Returns the error classification.
    pub fn kind(&self) -> ServiceErrorKind {
        self.kind
    }

    /// True for failures worth retrying as-is: network trouble, timeouts and 5xx.
    pub fn is_transient(&self) -> bool {
        match self.kind {
            ServiceErrorKind::Network | ServiceErrorKind::Timeout => true,
            ServiceErrorKind::Status(code) => code >= 500,
            ServiceErrorKind::Unauthorized | ServiceErrorKind::MalformedResponse => false,
        }
    }

    /// Message suitable for showing to the player.
    pub fn user_message(&self) -> String {
        match self.kind {
            ServiceErrorKind::Network => {
                "Network error. Please check your internet connection.".to_string()
            }
            ServiceErrorKind::Timeout => "The server took too long to respond.".to_string(),
            ServiceErrorKind::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            ServiceErrorKind::Status(_) | ServiceErrorKind::MalformedResponse => self.message.clone(),
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ServiceErrorKind::Timeout
        } else if err.is_decode() {
            ServiceErrorKind::MalformedResponse
        } else if let Some(status) = err.status() {
            ServiceErrorKind::Status(status.as_u16())
        } else {
            ServiceErrorKind::Network
        };
        Self::new(kind, err.to_string())
    }
}
