//! Stateless HTTP request builder and response parser for the myflix API.
//!
//! # Design
//! `MyflixClient` holds only a `base_url`. Each endpoint gets a `build_*`
//! method producing an `HttpRequest`; every response goes through the one
//! `parse` method, since the service is consumed untyped and the unwrap
//! rule is the same everywhere. Authenticated builders take the `Session`
//! snapshot so the token is whatever was stored at call time.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ApiError, Failure};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::session::{username_of, Session};
use crate::types::{Credentials, UserDetails};

/// Synchronous, stateless client for the myflix API.
#[derive(Debug, Clone)]
pub struct MyflixClient {
    base_url: String,
}

impl MyflixClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_register(&self, details: &UserDetails) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/users".to_string(), details, None)
    }

    pub fn build_login(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/login".to_string(), credentials, None)
    }

    pub fn build_list_movies(&self, session: &Session) -> HttpRequest {
        self.request(HttpMethod::Get, "/movies".to_string(), session)
    }

    pub fn build_get_movie(&self, title: &str, session: &Session) -> HttpRequest {
        self.request(HttpMethod::Get, format!("/movies/{}", segment(title)), session)
    }

    pub fn build_get_genre(&self, name: &str, session: &Session) -> HttpRequest {
        self.request(HttpMethod::Get, format!("/genres/{}", segment(name)), session)
    }

    pub fn build_get_director(&self, name: &str, session: &Session) -> HttpRequest {
        self.request(HttpMethod::Get, format!("/directors/{}", segment(name)), session)
    }

    /// `payload` is a JSON-encoded user object; `None` reads as `{}`.
    pub fn build_get_user(
        &self,
        payload: Option<&str>,
        session: &Session,
    ) -> Result<HttpRequest, ApiError> {
        let user: Value = serde_json::from_str(payload.unwrap_or("{}"))
            .map_err(|e| ApiError::InvalidPayload(e.to_string()))?;
        let username = username_of(&user).ok_or(ApiError::UserNotFound)?;
        Ok(self.request(HttpMethod::Get, format!("/users/{}", segment(username)), session))
    }

    pub fn build_edit_user(
        &self,
        details: &UserDetails,
        session: &Session,
    ) -> Result<HttpRequest, ApiError> {
        let path = format!("/users/{}", segment(&details.username));
        self.json_request(HttpMethod::Put, path, details, Some(session))
    }

    pub fn build_list_favorites(&self, username: &str, session: &Session) -> HttpRequest {
        self.request(HttpMethod::Get, format!("/users/{}/movies", segment(username)), session)
    }

    pub fn build_add_favorite(
        &self,
        movie_id: &str,
        session: &Session,
    ) -> Result<HttpRequest, ApiError> {
        let path = favorite_path(movie_id, session)?;
        self.json_request(HttpMethod::Post, path, &Map::new(), Some(session))
    }

    pub fn build_remove_favorite(
        &self,
        movie_id: &str,
        session: &Session,
    ) -> Result<HttpRequest, ApiError> {
        let path = favorite_path(movie_id, session)?;
        Ok(self.request(HttpMethod::Delete, path, session))
    }

    pub fn build_delete_user(&self, session: &Session) -> Result<HttpRequest, ApiError> {
        let username = session.username().ok_or(ApiError::MissingUsername)?;
        Ok(self.request(HttpMethod::Delete, format!("/users/{}", segment(&username)), session))
    }

    /// Unwrap a response body.
    ///
    /// Any 2xx is a success. Empty and falsy bodies become `{}`; a body that
    /// is not JSON comes back as a JSON string. Non-2xx statuses are logged
    /// and collapsed into `ApiError::Unavailable`.
    pub fn parse(&self, response: HttpResponse) -> Result<Value, ApiError> {
        if !response.is_success() {
            return Err(ApiError::unavailable(Failure::Server {
                status: response.status,
                body: response.body,
            }));
        }
        let body = response.body.trim();
        if body.is_empty() {
            return Ok(empty_object());
        }
        let value = serde_json::from_str::<Value>(body).unwrap_or_else(|_| Value::String(body.to_string()));
        Ok(if is_falsy(&value) { empty_object() } else { value })
    }

    fn request(&self, method: HttpMethod, path: String, session: &Session) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: auth_headers(session),
            body: None,
        }
    }

    fn json_request<T: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: String,
        body: &T,
        session: Option<&Session>,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut headers = vec![("content-type".to_string(), "application/json".to_string())];
        if let Some(session) = session {
            headers.extend(auth_headers(session));
        }
        Ok(HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers,
            body: Some(body),
        })
    }
}

fn auth_headers(session: &Session) -> Vec<(String, String)> {
    match &session.token {
        Some(token) => vec![("authorization".to_string(), format!("Bearer {token}"))],
        None => Vec::new(),
    }
}

fn favorite_path(movie_id: &str, session: &Session) -> Result<String, ApiError> {
    let username = session.username().ok_or(ApiError::MissingUsername)?;
    Ok(format!("/users/{}/movies/{}", segment(&username), segment(movie_id)))
}

fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
