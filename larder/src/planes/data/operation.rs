use crate::domain::request::GetRequest;
use async_trait::async_trait;
use bytes::Bytes;
use shared::Result;

/// Application-level read-through operations trait
/// This is the entry point embedding applications program against
#[async_trait]
pub trait ResponseOperations: Send + Sync + 'static {
    /// Return the content for a key, refreshing it first when stale
    async fn get_response(&self, request: GetRequest) -> Result<Option<Bytes>>;

    /// Stop the background maintenance task; idempotent and terminal
    async fn shutdown(&self);
}
