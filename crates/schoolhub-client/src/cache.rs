//! In-memory response cache shared by the stores.
//!
//! Values are stored as JSON so one map holds every response type. Entries
//! older than the TTL read as misses and are dropped on the next write.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::error::ClientError;

#[derive(Debug, Clone)]
struct Entry {
    stored_at: Instant,
    value: Value,
}

/// Cloning shares the underlying map.
#[derive(Debug, Clone)]
pub struct ClientCache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    ttl: Duration,
}

impl ClientCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached value when present and fresh.
    #[instrument(skip(self), fields(cache.operation = "GET"))]
    pub async fn get<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let entries = self.entries.read().await;
        let entry = match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => entry,
            Some(_) => {
                debug!(cache.key = %key, "Cache entry expired");
                return None;
            }
            None => {
                debug!(cache.key = %key, "Cache miss");
                return None;
            }
        };

        match serde_json::from_value(entry.value.clone()) {
            Ok(value) => {
                debug!(cache.key = %key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                warn!(cache.key = %key, error = %e, "Cached value has an unexpected shape");
                None
            }
        }
    }

    #[instrument(skip(self, value), fields(cache.operation = "SET"))]
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), ClientError>
    where
        T: Serialize,
    {
        let value = serde_json::to_value(value)?;
        let mut entries = self.entries.write().await;
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        entries.insert(
            key.to_string(),
            Entry {
                stored_at: Instant::now(),
                value,
            },
        );
        Ok(())
    }

    pub async fn invalidate(&self, key: &str) {
        if self.entries.write().await.remove(key).is_some() {
            debug!(cache.key = %key, "Cache entry invalidated");
        }
    }

    /// Drops every key starting with `prefix`; returns how many were dropped.
    pub async fn invalidate_prefix(&self, prefix: &str) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - entries.len();
        debug!(cache.prefix = %prefix, removed, "Cache prefix invalidated");
        removed
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of stored entries, fresh or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = ClientCache::new(Duration::from_secs(60));
        cache.set("students:id:1", &vec![1, 2, 3]).await.unwrap();

        let value: Option<Vec<i32>> = cache.get("students:id:1").await;
        assert_eq!(value, Some(vec![1, 2, 3]));
        assert_eq!(cache.get::<Vec<i32>>("students:id:2").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_a_miss() {
        let cache = ClientCache::new(Duration::from_secs(30));
        cache.set("session:user", &"admin").await.unwrap();

        tokio::time::advance(Duration::from_secs(29)).await;
        assert_eq!(cache.get::<String>("session:user").await.as_deref(), Some("admin"));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get::<String>("session:user").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_drops_expired_entries() {
        let cache = ClientCache::new(Duration::from_secs(10));
        cache.set("a", &1).await.unwrap();
        tokio::time::advance(Duration::from_secs(11)).await;
        cache.set("b", &2).await.unwrap();

        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_invalidate_prefix_only_touches_matching_keys() {
        let cache = ClientCache::new(Duration::from_secs(60));
        cache.set("students:list:abc", &1).await.unwrap();
        cache.set("students:id:1", &2).await.unwrap();
        cache.set("registrations:list:abc", &3).await.unwrap();

        assert_eq!(cache.invalidate_prefix("students:").await, 2);
        assert_eq!(cache.get::<i32>("students:id:1").await, None);
        assert_eq!(cache.get::<i32>("registrations:list:abc").await, Some(3));
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let cache = ClientCache::new(Duration::from_secs(60));
        cache.set("a", &1).await.unwrap();
        cache.set("b", &2).await.unwrap();

        cache.invalidate("a").await;
        assert_eq!(cache.get::<i32>("a").await, None);
        assert_eq!(cache.len().await, 1);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = ClientCache::new(Duration::from_secs(60));
        let other = cache.clone();
        other.set("a", &1).await.unwrap();
        assert_eq!(cache.get::<i32>("a").await, Some(1));
    }
}
