// Public API
pub mod control;
pub mod data;
