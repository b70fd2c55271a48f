//! Two process-management demos sharing one process layer:
//!
//! - `signal_demo`: latch SIGTERM and SIGINT sent by two forked children,
//!   exit once both have arrived
//! - `zombie_demo`: fork a batch of short-lived children and reap each one
//!   with a blocking wait, in creation order

pub mod cli;
pub mod commands;
pub mod process;
pub mod signals;
pub mod util;
pub mod zombie;
