use crate::domain::ExpirationMap;
use crate::ports::ExpirationStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{Error, Result};
use std::path::Path;
use tokio::sync::Mutex;

/// Record key the whole expiration map is stored under
const DEFAULT_STORAGE_KEY: &str = "cache-expirations";

/// Sled-backed expiration store
/// The entire key -> expiry map lives as one JSON record under `storage_key`,
/// so every mutation is a read-modify-write of the whole map. Mutations within
/// one instance are serialized; separate instances sharing a database and
/// storage key can still overwrite each other's writes.
pub struct SledExpirationStore {
    db: sled::Db,
    storage_key: String,
    write_lock: Mutex<()>,
}

impl SledExpirationStore {
    /// Open a store at `path` under the default storage key
    /// Creates the parent directory if it doesn't exist
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_storage_key(path, DEFAULT_STORAGE_KEY)
    }

    /// Open a store at `path` under a custom storage key, letting independent
    /// caches share one database without colliding
    pub fn with_storage_key(
        path: impl AsRef<Path>,
        storage_key: impl Into<String>,
    ) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("failed to create directory: {}", e)))?;
        }

        let db = sled::open(path)?;
        Ok(Self::from_db(db, storage_key))
    }

    /// Wrap an already-open database
    pub fn from_db(db: sled::Db, storage_key: impl Into<String>) -> Self {
        Self {
            db,
            storage_key: storage_key.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn read_map(&self) -> Result<ExpirationMap> {
        match self.db.get(self.storage_key.as_bytes())? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(ExpirationMap::new()),
        }
    }

    fn write_map(&self, map: &ExpirationMap) -> Result<()> {
        let value = serde_json::to_vec(map)?;
        self.db.insert(self.storage_key.as_bytes(), value)?;
        self.db.flush()?;
        Ok(())
    }
}

#[async_trait]
impl ExpirationStore for SledExpirationStore {
    async fn set(&self, key: &str, expires_at: DateTime<Utc>) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map()?;
        map.insert(key.to_string(), expires_at);
        self.write_map(&map)
    }

    async fn get(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self.read_map()?.get(key).copied())
    }

    async fn get_all(&self) -> Result<ExpirationMap> {
        self.read_map()
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}
