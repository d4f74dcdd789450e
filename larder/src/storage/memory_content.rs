use crate::ports::{ContentHandle, ContentStore, Fetcher};
use async_trait::async_trait;
use bytes::Bytes;
use shared::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-memory content store
/// Fills itself through the supplied fetcher on `fetch_and_persist`. Every
/// namespace opens onto the same shared state, and `fetch_count` reports how
/// many fetch-and-persist calls have run, which makes this the substitutable
/// double for exercising the response cache without a real backing store.
#[derive(Clone)]
pub struct MemoryContentStore {
    handle: Arc<MemoryContentHandle>,
}

/// Handle onto the shared in-memory content state
pub struct MemoryContentHandle {
    fetcher: Arc<dyn Fetcher>,
    entries: RwLock<HashMap<String, Bytes>>,
    fetch_count: AtomicUsize,
}

impl MemoryContentStore {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            handle: Arc::new(MemoryContentHandle {
                fetcher,
                entries: RwLock::new(HashMap::new()),
                fetch_count: AtomicUsize::new(0),
            }),
        }
    }

    /// Direct access to the shared handle
    pub fn handle(&self) -> Arc<MemoryContentHandle> {
        self.handle.clone()
    }

    /// Number of fetch-and-persist calls so far
    pub fn fetch_count(&self) -> usize {
        self.handle.fetch_count.load(Ordering::SeqCst)
    }

    /// Seed content directly, bypassing the fetcher
    pub async fn insert(&self, key: impl Into<String>, content: impl Into<Bytes>) {
        let mut entries = self.handle.entries.write().await;
        entries.insert(key.into(), content.into());
    }

    pub async fn contains(&self, key: &str) -> bool {
        let entries = self.handle.entries.read().await;
        entries.contains_key(key)
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn open(&self, _namespace: &str) -> Option<Arc<dyn ContentHandle>> {
        Some(self.handle.clone())
    }
}

#[async_trait]
impl ContentHandle for MemoryContentHandle {
    async fn fetch_and_persist(&self, key: &str) -> Result<()> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        match self.fetcher.fetch(key).await? {
            Some(content) => {
                let mut entries = self.entries.write().await;
                entries.insert(key.to_string(), content);
                Ok(())
            }
            None => Err(Error::Fetch(format!("no content available for '{}'", key))),
        }
    }

    async fn read(&self, key: &str) -> Result<Option<Bytes>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;
        Ok(entries.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticFetcher {
        body: Bytes,
    }

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, _key: &str) -> Result<Option<Bytes>> {
            Ok(Some(self.body.clone()))
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl Fetcher for FailingFetcher {
        async fn fetch(&self, key: &str) -> Result<Option<Bytes>> {
            Err(Error::Fetch(format!("unreachable: {}", key)))
        }
    }

    #[tokio::test]
    async fn test_fetch_and_persist_stores_content() {
        let store = MemoryContentStore::new(Arc::new(StaticFetcher {
            body: Bytes::from_static(b"payload"),
        }));
        let handle = store.handle();

        handle.fetch_and_persist("https://example.com/a").await.unwrap();

        let content = handle.read("https://example.com/a").await.unwrap();
        assert_eq!(content, Some(Bytes::from_static(b"payload")));
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_read_missing_key_is_none() {
        let store = MemoryContentStore::new(Arc::new(StaticFetcher {
            body: Bytes::from_static(b"payload"),
        }));

        let content = store.handle().read("https://example.com/missing").await.unwrap();
        assert_eq!(content, None);
    }

    #[tokio::test]
    async fn test_delete_reports_whether_content_existed() {
        let store = MemoryContentStore::new(Arc::new(StaticFetcher {
            body: Bytes::from_static(b"payload"),
        }));
        store.insert("https://example.com/a", Bytes::from_static(b"payload")).await;

        let handle = store.handle();
        assert!(handle.delete("https://example.com/a").await.unwrap());
        assert!(!handle.delete("https://example.com/a").await.unwrap());
    }

    #[tokio::test]
    async fn test_every_open_shares_one_state() {
        let store = MemoryContentStore::new(Arc::new(StaticFetcher {
            body: Bytes::from_static(b"payload"),
        }));

        let first = store.open("namespace-a").await.unwrap();
        first.fetch_and_persist("https://example.com/a").await.unwrap();

        let second = store.open("namespace-b").await.unwrap();
        let content = second.read("https://example.com/a").await.unwrap();
        assert_eq!(content, Some(Bytes::from_static(b"payload")));
    }

    #[tokio::test]
    async fn test_failed_fetch_persists_nothing_but_counts() {
        let store = MemoryContentStore::new(Arc::new(FailingFetcher));
        let handle = store.handle();

        let result = handle.fetch_and_persist("https://example.com/a").await;
        assert!(result.is_err());
        assert!(!store.contains("https://example.com/a").await);
        assert_eq!(store.fetch_count(), 1);
    }
}
