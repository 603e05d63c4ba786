//! Redis session store

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::domain::session::{SessionData, SessionId, SessionStore};
use crate::domain::DomainError;

/// Configuration for the Redis session store
#[derive(Debug, Clone)]
pub struct RedisSessionConfig {
    /// Key prefix for namespacing
    pub key_prefix: String,
    /// Session lifetime; refreshed on every read
    pub ttl: Duration,
}

impl Default for RedisSessionConfig {
    fn default() -> Self {
        Self {
            key_prefix: "sess".to_string(),
            ttl: Duration::from_secs(3600),
        }
    }
}

/// Redis-backed session store with a rolling TTL
#[derive(Clone)]
pub struct RedisSessionStore {
    connection: ConnectionManager,
    config: RedisSessionConfig,
}

impl fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisSessionStore")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisSessionStore {
    pub fn new(connection: ConnectionManager, config: RedisSessionConfig) -> Self {
        Self { connection, config }
    }

    fn session_key(&self, id: &SessionId) -> String {
        format!("{}:{}", self.config.key_prefix, id)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, data: SessionData) -> Result<SessionId, DomainError> {
        let id = SessionId::generate();
        let key = self.session_key(&id);
        let mut conn = self.connection.clone();

        let payload = serde_json::to_string(&data)
            .map_err(|e| DomainError::session(format!("Failed to serialize session: {}", e)))?;

        let _: () = conn
            .set_ex(&key, payload, self.config.ttl.as_secs().max(1))
            .await
            .map_err(|e| DomainError::session(format!("Failed to create session: {}", e)))?;

        Ok(id)
    }

    async fn get(&self, id: &SessionId) -> Result<Option<SessionData>, DomainError> {
        let key = self.session_key(id);
        let mut conn = self.connection.clone();

        let payload: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| DomainError::session(format!("Failed to read session: {}", e)))?;

        let Some(payload) = payload else {
            return Ok(None);
        };

        let data: SessionData = serde_json::from_str(&payload)
            .map_err(|e| DomainError::session(format!("Failed to deserialize session: {}", e)))?;

        // Rolling expiration: every authenticated request extends the
        // session by the full TTL.
        let _: bool = conn
            .expire(&key, self.config.ttl.as_secs().max(1) as i64)
            .await
            .map_err(|e| DomainError::session(format!("Failed to refresh session: {}", e)))?;

        Ok(Some(data))
    }

    async fn delete(&self, id: &SessionId) -> Result<bool, DomainError> {
        let key = self.session_key(id);
        let mut conn = self.connection.clone();

        let deleted: i32 = conn
            .del(&key)
            .await
            .map_err(|e| DomainError::session(format!("Failed to delete session: {}", e)))?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: the ignored tests require a running Redis instance.
    // Run with: cargo test -- --ignored

    async fn test_store() -> RedisSessionStore {
        let client = redis::Client::open("redis://127.0.0.1:6379").unwrap();
        let connection = ConnectionManager::new(client).await.unwrap();

        RedisSessionStore::new(
            connection,
            RedisSessionConfig {
                key_prefix: "test-sess".to_string(),
                ttl: Duration::from_secs(60),
            },
        )
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_session_roundtrip() {
        let store = test_store().await;

        let id = store.create(SessionData { user_id: 42 }).await.unwrap();
        let data = store.get(&id).await.unwrap();
        assert_eq!(data, Some(SessionData { user_id: 42 }));

        // Cleanup
        assert!(store.delete(&id).await.unwrap());
        assert_eq!(store.get(&id).await.unwrap(), None);
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_delete_unknown_session() {
        let store = test_store().await;

        let id = SessionId::generate();
        assert!(!store.delete(&id).await.unwrap());
    }
}
