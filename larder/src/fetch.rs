use crate::ports::Fetcher;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use shared::{Error, Result};
use tracing::{debug, warn};

/// HTTP fetcher treating cache keys as URLs
/// Backs the direct, uncached fallback when no content store is available
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, key: &str) -> Result<Option<Bytes>> {
        debug!("Fetching '{}' directly", key);

        let response = self
            .client
            .get(key)
            .send()
            .await
            .map_err(|e| Error::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            warn!("Fetch of '{}' returned status {}", key, response.status());
            return Err(Error::Fetch(format!(
                "'{}' returned status {}",
                key,
                response.status()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Fetch(e.to_string()))?;

        Ok(Some(body))
    }
}
