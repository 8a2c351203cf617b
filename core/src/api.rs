//! The API client facade: one method per myflix endpoint.
//!
//! # Design
//! `MyflixApi` glues the three pieces together for each call: it snapshots
//! the stored `Session`, asks `MyflixClient` for the request, hands it to
//! the `Transport`, and unwraps the response. Precondition failures return
//! before the transport is touched. Calls share nothing but read access to
//! the store, so a facade can serve concurrent callers.

use serde_json::Value;

use crate::client::MyflixClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, Failure};
use crate::http::HttpRequest;
use crate::session::{CredentialStore, Session};
use crate::transport::Transport;
use crate::types::{Credentials, UserDetails};

pub struct MyflixApi<S, T> {
    client: MyflixClient,
    store: S,
    transport: T,
}

impl<S: CredentialStore, T: Transport> MyflixApi<S, T> {
    pub fn new(config: &ClientConfig, store: S, transport: T) -> Self {
        Self {
            client: MyflixClient::new(&config.base_url),
            store,
            transport,
        }
    }

    pub fn client(&self) -> &MyflixClient {
        &self.client
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create an account. Returns the created user.
    pub fn register(&self, details: &UserDetails) -> Result<Value, ApiError> {
        self.send(self.client.build_register(details)?)
    }

    /// Returns `{"user": .., "token": ..}`. Storing the result is up to the
    /// caller (see `Session::save`).
    pub fn login(&self, credentials: &Credentials) -> Result<Value, ApiError> {
        self.send(self.client.build_login(credentials)?)
    }

    pub fn list_movies(&self) -> Result<Value, ApiError> {
        self.send(self.client.build_list_movies(&self.session()))
    }

    pub fn get_movie(&self, title: &str) -> Result<Value, ApiError> {
        self.send(self.client.build_get_movie(title, &self.session()))
    }

    pub fn get_genre(&self, name: &str) -> Result<Value, ApiError> {
        self.send(self.client.build_get_genre(name, &self.session()))
    }

    pub fn get_director(&self, name: &str) -> Result<Value, ApiError> {
        self.send(self.client.build_get_director(name, &self.session()))
    }

    /// Fetch the profile of the user described by `payload`, a JSON user
    /// object (usually the stored one).
    pub fn get_user(&self, payload: Option<&str>) -> Result<Value, ApiError> {
        self.send(self.client.build_get_user(payload, &self.session())?)
    }

    pub fn edit_user(&self, details: &UserDetails) -> Result<Value, ApiError> {
        self.send(self.client.build_edit_user(details, &self.session())?)
    }

    pub fn list_favorites(&self, username: &str) -> Result<Value, ApiError> {
        self.send(self.client.build_list_favorites(username, &self.session()))
    }

    /// Add `movie_id` to the stored user's favorites.
    pub fn add_favorite(&self, movie_id: &str) -> Result<Value, ApiError> {
        self.send(self.client.build_add_favorite(movie_id, &self.session())?)
    }

    /// Remove `movie_id` from the stored user's favorites.
    pub fn remove_favorite(&self, movie_id: &str) -> Result<Value, ApiError> {
        self.send(self.client.build_remove_favorite(movie_id, &self.session())?)
    }

    /// Delete the stored user's account.
    pub fn delete_user(&self) -> Result<Value, ApiError> {
        self.send(self.client.build_delete_user(&self.session())?)
    }

    fn session(&self) -> Session {
        Session::load(&self.store)
    }

    fn send(&self, request: HttpRequest) -> Result<Value, ApiError> {
        tracing::debug!(method = request.method.as_str(), url = %request.path, "sending request");
        let response = self
            .transport
            .execute(request)
            .map_err(|e| ApiError::unavailable(Failure::Network(e.0)))?;
        self.client.parse(response)
    }
}
