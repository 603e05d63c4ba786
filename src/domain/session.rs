//! Session identity and the session store abstraction

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Opaque session identifier, delivered to clients as a cookie value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap a value received from a client cookie. No validation
    /// beyond non-emptiness: an unknown id simply misses the store.
    pub fn from_cookie(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(Self(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State bound to an authenticated session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    /// Referenced user id. Not enforced against the users table: the
    /// user may be deleted while the session lives on, and the guard
    /// rejects such dangling sessions at lookup time.
    pub user_id: i64,
}

/// Key-value store holding session state between requests.
///
/// Implementations apply a rolling expiry: `get` refreshes the TTL of
/// the entry it returns.
#[async_trait]
pub trait SessionStore: Send + Sync + Debug {
    /// Persist new session state, returning its fresh identifier
    async fn create(&self, data: SessionData) -> Result<SessionId, DomainError>;

    /// Look up session state, refreshing its expiry on a hit
    async fn get(&self, id: &SessionId) -> Result<Option<SessionData>, DomainError>;

    /// Destroy a session. Returns whether an entry existed.
    async fn delete(&self, id: &SessionId) -> Result<bool, DomainError>;
}
