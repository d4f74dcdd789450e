// Public API
pub mod maintenance;

// Re-export commonly used types
pub use maintenance::MaintenanceScheduler;
