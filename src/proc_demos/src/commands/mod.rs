//! Command handlers

pub mod signal_demo;
pub mod zombie_demo;

// Re-export command handlers
pub use signal_demo::handle_signal_demo;
pub use zombie_demo::handle_zombie_demo;
