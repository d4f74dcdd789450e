use crate::ports::{ContentStore, ExpirationStore, Fetcher};
use chrono::{DateTime, Utc};
use shared::TtlMs;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub mod request {
    use shared::TtlMs;

    /// A single cached-read request
    #[derive(Clone, Debug)]
    pub struct GetRequest {
        pub key: String,          // opaque cache key (a URL in the default setup)
        pub use_cache: bool,      // false = always fetch, never consult freshness
        pub ttl: Option<TtlMs>,   // per-call override of the instance default
    }

    impl GetRequest {
        pub fn new(key: impl Into<String>) -> Self {
            Self {
                key: key.into(),
                use_cache: true,
                ttl: None,
            }
        }

        /// Skip the freshness check and refresh unconditionally
        pub fn bypass_cache(mut self) -> Self {
            self.use_cache = false;
            self
        }

        /// Use a different TTL for the expiry written by this call
        pub fn with_ttl(mut self, ttl: TtlMs) -> Self {
            self.ttl = Some(ttl);
            self
        }
    }
}

/// Full key -> expiry mapping held by an expiration store
pub type ExpirationMap = HashMap<String, DateTime<Utc>>;

/// Configuration for a ResponseCache instance
/// Every field has a default; stores left as `None` are resolved at construction
#[derive(Clone)]
pub struct CacheOptions {
    pub cache_name: String,             // namespace handed to the content store
    pub default_ttl: TtlMs,             // freshness window for new expiry records
    pub maintenance_interval: Duration, // gap between background sweeps
    pub data_dir: PathBuf,              // backing dir for the default expiration store
    pub expiration_store: Option<Arc<dyn ExpirationStore>>,
    pub content_store: Option<Arc<dyn ContentStore>>,
    pub fetcher: Option<Arc<dyn Fetcher>>,
}

impl CacheOptions {
    pub const DEFAULT_CACHE_NAME: &str = "larder-responses";
    pub const DEFAULT_TTL: TtlMs = TtlMs(15 * 60 * 1000);
    pub const DEFAULT_MAINTENANCE_INTERVAL: Duration = Duration::from_secs(5 * 60);
    pub const DEFAULT_DATA_DIR: &str = "./data";

    pub fn from_env() -> Self {
        let default_ttl = std::env::var("LARDER_DEFAULT_TTL_MS")
            .unwrap_or_else(|_| Self::DEFAULT_TTL.0.to_string())
            .parse::<u64>()
            .map(TtlMs)
            .unwrap_or(Self::DEFAULT_TTL);
        let maintenance_interval = std::env::var("LARDER_MAINTENANCE_INTERVAL_MS")
            .unwrap_or_else(|_| Self::DEFAULT_MAINTENANCE_INTERVAL.as_millis().to_string())
            .parse::<u64>()
            .map(Duration::from_millis)
            .unwrap_or(Self::DEFAULT_MAINTENANCE_INTERVAL);
        Self {
            cache_name: std::env::var("LARDER_CACHE_NAME")
                .unwrap_or_else(|_| Self::DEFAULT_CACHE_NAME.to_string()),
            default_ttl,
            maintenance_interval,
            data_dir: std::env::var("LARDER_DATA_DIR")
                .unwrap_or_else(|_| Self::DEFAULT_DATA_DIR.to_string())
                .into(),
            expiration_store: None,
            content_store: None,
            fetcher: None,
        }
    }
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            cache_name: Self::DEFAULT_CACHE_NAME.to_string(),
            default_ttl: Self::DEFAULT_TTL,
            maintenance_interval: Self::DEFAULT_MAINTENANCE_INTERVAL,
            data_dir: Self::DEFAULT_DATA_DIR.into(),
            expiration_store: None,
            content_store: None,
            fetcher: None,
        }
    }
}

impl std::fmt::Debug for CacheOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheOptions")
            .field("cache_name", &self.cache_name)
            .field("default_ttl", &self.default_ttl)
            .field("maintenance_interval", &self.maintenance_interval)
            .field("data_dir", &self.data_dir)
            .field("expiration_store", &self.expiration_store.is_some())
            .field("content_store", &self.content_store.is_some())
            .field("fetcher", &self.fetcher.is_some())
            .finish()
    }
}
