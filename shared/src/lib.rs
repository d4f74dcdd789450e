// shared/src/lib.rs

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("cache key must not be empty")]
    EmptyKey,
    #[error("storage: {0}")]
    Storage(String),
    #[error("serialization: {0}")]
    Serialization(String),
    #[error("content store: {0}")]
    ContentStore(String),
    #[error("fetch: {0}")]
    Fetch(String),
}

impl From<sled::Error> for Error {
    fn from(err: sled::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Time-to-live in milliseconds. Zero means the entry expires immediately.
#[derive(Clone, Copy, Debug)]
pub struct TtlMs(pub u64);
