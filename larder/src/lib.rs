// Public API
pub mod domain;
pub mod fetch;
pub mod planes;
pub mod ports;
pub mod storage;

// Re-export commonly used types
pub use domain::{CacheOptions, ExpirationMap, request::GetRequest};
pub use fetch::HttpFetcher;
pub use planes::data::{ResponseCache, ResponseOperations};
pub use ports::{ContentHandle, ContentStore, ExpirationStore, Fetcher};
pub use shared::{Error, Result, TtlMs};
pub use storage::{MemoryContentStore, MemoryExpirationStore, SledExpirationStore};
