//! Signal handling for the signal demo

pub mod coordinator;
pub mod handler;
pub mod latch;

pub use coordinator::{SignalCoordinator, WaitSummary};
pub use handler::{install_handler, termination_signals};
pub use latch::{SignalLatches, TerminationSignal};
