//! Domain DTOs for the myflix API.
//!
//! # Design
//! Field names follow the service's PascalCase JSON schema. Request payloads
//! skip absent optional fields so the body on the wire is exactly what the
//! caller filled in. Responses stay untyped (`serde_json::Value`) at the
//! client surface; `User` is provided for callers and the stored session.

use serde::{Deserialize, Serialize};

/// A registered user as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "FavoriteMovies", default)]
    pub favorite_movies: Vec<String>,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Email", default)]
    pub email: String,
    #[serde(rename = "Birthday", default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
}

/// Payload for registering or editing a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserDetails {
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "Email", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "Birthday", skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
}

/// Payload for logging in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password")]
    pub password: String,
}
