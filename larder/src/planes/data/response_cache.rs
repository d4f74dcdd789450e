use crate::domain::CacheOptions;
use crate::domain::request::GetRequest;
use crate::fetch::HttpFetcher;
use crate::planes::control::maintenance::{MaintenanceScheduler, Sweeper};
use crate::planes::data::operation::ResponseOperations;
use crate::ports::{ContentHandle, ContentStore, ExpirationStore, Fetcher};
use crate::storage::SledExpirationStore;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use shared::{Error, Result, TtlMs};
use std::sync::Arc;
use tracing::{debug, warn};

/// Read-through response cache
/// Serves persisted content while its expiry record is fresh, refreshes it
/// through the content store when stale, and falls back to a direct fetch
/// when the content store is unavailable
pub struct ResponseCache {
    cache_name: String,
    default_ttl: TtlMs,
    expiration_store: Arc<dyn ExpirationStore>,
    content_store: Option<Arc<dyn ContentStore>>,
    fetcher: Arc<dyn Fetcher>,
    scheduler: MaintenanceScheduler,
}

impl ResponseCache {
    /// Build a cache from options, resolving any defaulted collaborators,
    /// then run one maintenance sweep to completion and arm the recurring one
    pub async fn new(options: CacheOptions) -> Result<Self> {
        let expiration_store: Arc<dyn ExpirationStore> = match options.expiration_store {
            Some(store) => store,
            None => Arc::new(SledExpirationStore::open(
                options.data_dir.join("expirations"),
            )?),
        };
        let fetcher: Arc<dyn Fetcher> = options
            .fetcher
            .unwrap_or_else(|| Arc::new(HttpFetcher::new()));

        let sweeper = Sweeper {
            cache_name: options.cache_name.clone(),
            expiration_store: expiration_store.clone(),
            content_store: options.content_store.clone(),
        };
        sweeper.sweep().await;
        let scheduler = MaintenanceScheduler::start(sweeper, options.maintenance_interval);

        Ok(Self {
            cache_name: options.cache_name,
            default_ttl: options.default_ttl,
            expiration_store,
            content_store: options.content_store,
            fetcher,
            scheduler,
        })
    }

    /// Whether the background maintenance task is still armed
    pub fn maintenance_active(&self) -> bool {
        self.scheduler.is_active()
    }

    async fn open_content(&self) -> Option<Arc<dyn ContentHandle>> {
        match &self.content_store {
            Some(store) => store.open(&self.cache_name).await,
            None => None,
        }
    }

    /// A key needs refreshing when it has no expiry record or the record has
    /// passed. A metadata read failure degrades the same direction.
    async fn needs_refresh(&self, key: &str) -> bool {
        match self.expiration_store.get(key).await {
            Ok(Some(expires_at)) => Utc::now() > expires_at,
            Ok(None) => true,
            Err(e) => {
                warn!("Could not read expiry for '{}', treating it as stale: {}", key, e);
                true
            }
        }
    }

    /// Cached content for a fresh key, or `None` when there is nothing to
    /// serve. A read failure is logged and reported as a miss.
    async fn read_cached(&self, key: &str) -> Option<Bytes> {
        let handle = self.open_content().await?;
        match handle.read(key).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Could not read cached content for '{}', refreshing instead: {}", key, e);
                None
            }
        }
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("cache_name", &self.cache_name)
            .field("default_ttl", &self.default_ttl)
            .field("maintenance_active", &self.maintenance_active())
            .finish()
    }
}

#[async_trait]
impl ResponseOperations for ResponseCache {
    /// Serve cached content while it is fresh, refresh it when it is not
    async fn get_response(&self, request: GetRequest) -> Result<Option<Bytes>> {
        if request.key.is_empty() {
            return Err(Error::EmptyKey);
        }

        if request.use_cache && !self.needs_refresh(&request.key).await {
            if let Some(content) = self.read_cached(&request.key).await {
                debug!("Cache hit for '{}'", request.key);
                return Ok(Some(content));
            }
            debug!("Fresh expiry but nothing cached for '{}', refreshing", request.key);
        }

        match self.open_content().await {
            Some(handle) => {
                handle.fetch_and_persist(&request.key).await?;
                let content = handle.read(&request.key).await?;

                // A TTL past the representable timestamp range saturates
                // to the far future instead of wrapping or overflowing
                let ttl = request.ttl.unwrap_or(self.default_ttl);
                let ttl_ms = i64::try_from(ttl.0).unwrap_or(i64::MAX);
                let expires_at = Utc::now()
                    .checked_add_signed(ChronoDuration::milliseconds(ttl_ms))
                    .unwrap_or(DateTime::<Utc>::MAX_UTC);
                if let Err(e) = self.expiration_store.set(&request.key, expires_at).await {
                    warn!(
                        "Could not record expiry for '{}', it will refresh on next read: {}",
                        request.key, e
                    );
                }

                debug!("Refreshed '{}'", request.key);
                Ok(content)
            }
            None => {
                debug!("Content store unavailable, fetching '{}' directly", request.key);
                self.fetcher.fetch(&request.key).await
            }
        }
    }

    async fn shutdown(&self) {
        self.scheduler.stop().await;
    }
}
