// Public API
pub mod memory_content;
pub mod memory_store;
pub mod sled_store;

// Re-export commonly used types
pub use memory_content::{MemoryContentHandle, MemoryContentStore};
pub use memory_store::MemoryExpirationStore;
pub use sled_store::SledExpirationStore;
