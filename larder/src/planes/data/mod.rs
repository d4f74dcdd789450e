// Public API
pub mod operation;
pub mod response_cache;

// Re-export commonly used types
pub use operation::ResponseOperations;
pub use response_cache::ResponseCache;
