//! Ambient credential storage.
//!
//! The surrounding application persists the bearer token and the logged-in
//! user under the `token` and `user` keys after login. The API facade only
//! reads them, once per call, through `Session::load`.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Persisted key/value storage outside the client's lifecycle.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

impl<S: CredentialStore + ?Sized> CredentialStore for Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

/// In-process `CredentialStore`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
    }
}

/// Snapshot of the stored credentials taken at call time.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub token: Option<String>,
    user: Option<String>,
}

impl Session {
    /// `user` is the raw stored value: a JSON user object or a bare username.
    pub fn new(token: Option<String>, user: Option<String>) -> Self {
        Self { token, user }
    }

    pub fn load<S: CredentialStore + ?Sized>(store: &S) -> Self {
        Self {
            token: store.get(TOKEN_KEY),
            user: store.get(USER_KEY),
        }
    }

    /// Persist `token` and `user` (a JSON-encoded user object).
    pub fn save<S: CredentialStore + ?Sized>(store: &S, token: &str, user: &Value) {
        store.set(TOKEN_KEY, token.to_string());
        store.set(USER_KEY, user.to_string());
    }

    pub fn clear<S: CredentialStore + ?Sized>(store: &S) {
        store.remove(TOKEN_KEY);
        store.remove(USER_KEY);
    }

    /// Username of the stored user.
    ///
    /// The stored value is normally a JSON user object. A JSON string, or a
    /// value that does not parse as JSON, is taken as a bare username; any
    /// other JSON value (`null`, numbers, arrays) carries none.
    pub fn username(&self) -> Option<String> {
        let raw = self.user.as_deref()?;
        let bare = match serde_json::from_str::<Value>(raw) {
            Ok(value @ Value::Object(_)) => return username_of(&value).map(str::to_string),
            Ok(Value::String(name)) => name,
            Ok(_) => return None,
            Err(_) => raw.to_string(),
        };
        let bare = bare.trim();
        (!bare.is_empty()).then(|| bare.to_string())
    }
}

/// Non-empty `Username` field of a JSON user object.
pub(crate) fn username_of(value: &Value) -> Option<&str> {
    value
        .get("Username")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
}
