//! Error types for profile resolution.
//!
//! `ResolutionError` is what the caller sees. `LookupError` describes why a
//! single relayed call failed; whether that is fatal depends on the lookup.

use thiserror::Error;

/// Errors surfaced to the caller of a resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// A required form field was blank.
    #[error("{field} must not be empty")]
    EmptyInput { field: &'static str },

    /// The username search returned no matches.
    #[error("User not found: {identifier}")]
    UserNotFound { identifier: String },

    /// A mandatory lookup failed.
    #[error("Failed to fetch {lookup} for '{subject}': {reason}")]
    FetchFailed {
        lookup: &'static str,
        subject: String,
        reason: String,
    },
}

impl ResolutionError {
    /// Creates an EmptyInput error
    pub fn empty_input(field: &'static str) -> Self {
        Self::EmptyInput { field }
    }

    /// Creates a UserNotFound error
    pub fn user_not_found(identifier: impl Into<String>) -> Self {
        Self::UserNotFound {
            identifier: identifier.into(),
        }
    }

    /// Creates a FetchFailed error
    pub fn fetch_failed(
        lookup: &'static str,
        subject: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self::FetchFailed {
            lookup,
            subject: subject.into(),
            reason: reason.to_string(),
        }
    }
}

/// Failure of one relayed call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The relay or the upstream API answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// The body was not JSON or did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The body decoded but an expected value was absent.
    #[error("missing field '{0}'")]
    MissingField(&'static str),
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LookupError::Transport(format!("request timed out: {}", e))
        } else if e.is_connect() {
            LookupError::Transport(format!("cannot connect to relay: {}", e))
        } else if let Some(status) = e.status() {
            LookupError::Status(status.as_u16())
        } else {
            LookupError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(e: serde_json::Error) -> Self {
        LookupError::Decode(e.to_string())
    }
}
