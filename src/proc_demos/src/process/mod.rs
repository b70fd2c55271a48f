//! Process management utilities

pub mod child;
pub mod reap;
pub mod registry;
pub mod spawner;

#[cfg(test)]
pub(crate) mod fake;

// Re-export commonly used items
pub use child::ChildTask;
pub use reap::{wait_for, ReapOutcome, ReapRecord, WaitMode};
pub use registry::{ChildEntry, ChildRegistry};
pub use spawner::{ForkProcessOps, ProcessOps};
