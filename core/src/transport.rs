//! The I/O seam between `MyflixApi` and an HTTP client.

use std::sync::Arc;

use thiserror::Error;

use crate::http::{HttpRequest, HttpResponse};

/// No response was received for a request.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Executes one HTTP round-trip.
///
/// Non-2xx statuses are responses, not errors: only failures that leave no
/// response to inspect (DNS, connect, TLS, broken body) are `Err`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}
