//! Client core for the myflix movie-catalog API.
//!
//! # Overview
//! `MyflixClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern).
//! `MyflixApi` is the facade applications call: one method per endpoint,
//! reading the bearer token and logged-in user from a `CredentialStore`
//! and executing requests through a `Transport`.
//!
//! # Design
//! - Responses are consumed untyped (`serde_json::Value`); empty or falsy
//!   bodies come back as `{}`.
//! - Network and server failures are logged and collapsed into one
//!   friendly `ApiError::Unavailable`, which still carries the `Failure`.
//! - Calls that address the logged-in user fail before any I/O when the
//!   stored user has no username.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod transport;
pub mod types;

pub use api::MyflixApi;
pub use client::MyflixClient;
pub use config::ClientConfig;
pub use error::{ApiError, Failure, GENERIC_FAILURE};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::{CredentialStore, MemoryStore, Session};
pub use transport::{Transport, TransportError};
pub use types::{Credentials, User, UserDetails};
