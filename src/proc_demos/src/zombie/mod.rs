//! Zombie prevention by ordered blocking reaps

pub mod coordinator;

pub use coordinator::{exit_code_for, BatchReport, ZombieCoordinator};
