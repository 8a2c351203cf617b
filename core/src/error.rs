//! Error types for the myflix API client.
//!
//! # Design
//! Precondition failures (no username to address a request to, unreadable
//! payload) are raised before any request is built and keep their own
//! variants. Everything that goes wrong on the wire collapses into
//! `Unavailable`, which always displays the same friendly message but keeps
//! the underlying `Failure` for callers that need to tell a 401 from a 500.

use thiserror::Error;

/// The message shown for every network or server failure.
pub const GENERIC_FAILURE: &str = "Something bad happened; please try again later.";

/// What actually went wrong behind an `ApiError::Unavailable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// No response was received.
    Network(String),
    /// The server answered with a non-2xx status.
    Server { status: u16, body: String },
}

impl Failure {
    /// HTTP status, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Failure::Network(_) => None,
            Failure::Server { status, .. } => Some(*status),
        }
    }
}

/// Errors returned by `MyflixClient` and `MyflixApi`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The user payload handed to `get_user` carries no username.
    #[error("User does not exists")]
    UserNotFound,

    /// The stored user carries no username.
    #[error("User object does not contain username")]
    MissingUsername,

    /// The user payload handed to `get_user` is not JSON.
    #[error("invalid user payload: {0}")]
    InvalidPayload(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Network or server failure.
    #[error("Something bad happened; please try again later.")]
    Unavailable(Failure),
}

impl ApiError {
    /// Log `failure` and wrap it in the generic user-facing error.
    pub(crate) fn unavailable(failure: Failure) -> Self {
        match &failure {
            Failure::Network(error) => {
                tracing::error!(%error, "network error");
            }
            Failure::Server { status, body } => {
                tracing::error!(status, %body, "server error");
            }
        }
        ApiError::Unavailable(failure)
    }

    /// The underlying failure, for `Unavailable` errors.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            ApiError::Unavailable(failure) => Some(failure),
            _ => None,
        }
    }
}
