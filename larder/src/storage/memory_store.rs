use crate::domain::ExpirationMap;
use crate::ports::ExpirationStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::Result;
use tokio::sync::RwLock;

/// In-memory expiration store
/// Nothing survives the process; useful for tests and for setups where the
/// content store itself is ephemeral
#[derive(Default)]
pub struct MemoryExpirationStore {
    entries: RwLock<ExpirationMap>,
}

impl MemoryExpirationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExpirationStore for MemoryExpirationStore {
    async fn set(&self, key: &str, expires_at: DateTime<Utc>) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), expires_at);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).copied())
    }

    async fn get_all(&self) -> Result<ExpirationMap> {
        let entries = self.entries.read().await;
        Ok(entries.clone())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_set_get_and_remove() {
        let store = MemoryExpirationStore::new();
        let expires_at = Utc::now() + Duration::milliseconds(250);

        store.set("https://example.com/a", expires_at).await.unwrap();
        assert_eq!(store.get("https://example.com/a").await.unwrap(), Some(expires_at));

        store.remove("https://example.com/a").await.unwrap();
        assert_eq!(store.get("https://example.com/a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_all_is_a_snapshot() {
        let store = MemoryExpirationStore::new();
        store.set("https://example.com/a", Utc::now()).await.unwrap();

        let snapshot = store.get_all().await.unwrap();
        store.remove("https://example.com/a").await.unwrap();

        // The snapshot is detached from later mutations
        assert_eq!(snapshot.len(), 1);
        assert!(store.get_all().await.unwrap().is_empty());
    }
}
