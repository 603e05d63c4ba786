//! In-memory session store for tests and single-process setups

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::domain::session::{SessionData, SessionId, SessionStore};
use crate::domain::DomainError;

#[derive(Debug, Clone)]
struct StoredSession {
    data: SessionData,
    expires_at: Instant,
}

#[derive(Debug)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, StoredSession>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(3600))
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, data: SessionData) -> Result<SessionId, DomainError> {
        let id = SessionId::generate();
        let stored = StoredSession {
            data,
            expires_at: Instant::now() + self.ttl,
        };

        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| DomainError::session("Session store lock poisoned"))?;
        sessions.insert(id.as_str().to_string(), stored);

        Ok(id)
    }

    async fn get(&self, id: &SessionId) -> Result<Option<SessionData>, DomainError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| DomainError::session("Session store lock poisoned"))?;

        match sessions.get_mut(id.as_str()) {
            Some(stored) if stored.expires_at > Instant::now() => {
                stored.expires_at = Instant::now() + self.ttl;
                Ok(Some(stored.data))
            }
            Some(_) => {
                sessions.remove(id.as_str());
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &SessionId) -> Result<bool, DomainError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| DomainError::session("Session store lock poisoned"))?;

        Ok(sessions.remove(id.as_str()).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get() {
        let store = InMemorySessionStore::default();

        let id = store.create(SessionData { user_id: 42 }).await.unwrap();
        let data = store.get(&id).await.unwrap();

        assert_eq!(data, Some(SessionData { user_id: 42 }));
    }

    #[tokio::test]
    async fn test_get_unknown_session() {
        let store = InMemorySessionStore::default();

        let id = SessionId::generate();
        assert_eq!(store.get(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemorySessionStore::default();

        let id = store.create(SessionData { user_id: 1 }).await.unwrap();

        assert!(store.delete(&id).await.unwrap());
        assert!(!store.delete(&id).await.unwrap());
        assert_eq!(store.get(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_session_is_gone() {
        let store = InMemorySessionStore::new(Duration::from_millis(1));

        let id = store.create(SessionData { user_id: 1 }).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(store.get(&id).await.unwrap(), None);
    }
}
