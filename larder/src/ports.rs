#![deny(clippy::all)]

use crate::domain::ExpirationMap;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use shared::Result;
use std::sync::Arc;

// Ports are the pluggable extension points for the stores this crate sits in front of

/// Port for the expiration-metadata store
/// Tracks, per key, the absolute time after which the cached copy is stale
#[async_trait]
pub trait ExpirationStore: Send + Sync + 'static {
    /// Record or overwrite the expiry timestamp for a key
    async fn set(&self, key: &str, expires_at: DateTime<Utc>) -> Result<()>;

    /// Look up the expiry timestamp for a key, `None` if never recorded
    async fn get(&self, key: &str) -> Result<Option<DateTime<Utc>>>;

    /// Return the full key -> expiry mapping (empty map if nothing recorded)
    async fn get_all(&self) -> Result<ExpirationMap>;

    /// Drop the expiry record for a key; removing an unknown key is a no-op
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Port for the opaque content store this crate adds freshness tracking to
#[async_trait]
pub trait ContentStore: Send + Sync + 'static {
    /// Open the named content namespace
    /// `None` means the store is unavailable right now; callers fall back to
    /// direct fetching for that call
    async fn open(&self, namespace: &str) -> Option<Arc<dyn ContentHandle>>;
}

/// Handle to one open content namespace
#[async_trait]
pub trait ContentHandle: Send + Sync + 'static {
    /// Fetch the resource for `key` and persist it in the namespace
    async fn fetch_and_persist(&self, key: &str) -> Result<()>;

    /// Return the persisted content for `key`, `None` if nothing is stored
    async fn read(&self, key: &str) -> Result<Option<Bytes>>;

    /// Delete the persisted content for `key`; returns whether anything was deleted
    async fn delete(&self, key: &str) -> Result<bool>;
}

/// Port for fetching a resource without persisting it anywhere
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    async fn fetch(&self, key: &str) -> Result<Option<Bytes>>;
}
