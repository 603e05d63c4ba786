//! In-memory cache implementation

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::cache::Cache;
use crate::domain::DomainError;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// Moka-backed cache, used in tests and single-process setups
#[derive(Debug, Clone)]
pub struct InMemoryCache {
    entries: MokaCache<String, Entry>,
}

impl InMemoryCache {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            entries: MokaCache::builder().max_capacity(max_capacity).build(),
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        match self.entries.get(key).await {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value)),
            Some(_) => {
                self.entries.invalidate(key).await;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };

        self.entries.insert(key.to_string(), entry).await;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let existed = self.entries.get(key).await.is_some();
        self.entries.invalidate(key).await;

        Ok(existed)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.entries.invalidate_all();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::CacheExt;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = InMemoryCache::default();

        cache
            .set("key", &"value".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        let value: Option<String> = cache.get("key").await.unwrap();
        assert_eq!(value, Some("value".to_string()));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let cache = InMemoryCache::default();

        let value: Option<String> = cache.get("missing").await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_expired_entry_is_evicted() {
        let cache = InMemoryCache::default();

        cache
            .set_raw("key", "value", Duration::from_millis(1))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;

        let value = cache.get_raw("key").await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = InMemoryCache::default();

        cache
            .set_raw("key", "value", Duration::from_secs(60))
            .await
            .unwrap();

        assert!(cache.delete("key").await.unwrap());
        assert!(!cache.delete("key").await.unwrap());
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = InMemoryCache::default();

        cache
            .set_raw("a", "1", Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set_raw("b", "2", Duration::from_secs(60))
            .await
            .unwrap();

        cache.clear().await.unwrap();
        // moka's invalidate_all is eventually consistent; run pending
        // tasks so the assertion below is deterministic.
        cache.entries.run_pending_tasks().await;

        assert_eq!(cache.get_raw("a").await.unwrap(), None);
        assert_eq!(cache.get_raw("b").await.unwrap(), None);
    }
}
