//! Work performed inside a forked child
//!
//! A [`ChildTask`] describes everything a child does between `fork()` and
//! its exit. The parent builds the task, hands it to a [`ProcessOps`]
//! implementation, and only ever observes the outcome through `waitpid`.
//!
//! [`ProcessOps`]: super::ProcessOps

use nix::{
    sys::signal::{kill, Signal},
    unistd::{getpid, getppid, Pid},
};
use std::time::Duration;
use tracing::{error, info};

/// What a child process does before exiting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildTask {
    /// Sleep, deliver `signal` to `parent`, then exit 0 (1 if delivery fails)
    SignalParent {
        /// Human-readable label used in log lines, e.g. "CHILD 1"
        label: String,
        /// Time to sleep before sending the signal
        delay: Duration,
        /// Parent PID captured before the fork
        parent: Pid,
        /// Signal delivered to the parent
        signal: Signal,
    },
    /// Sleep, then exit with `code`
    ExitAfter {
        /// 1-based position in the batch
        slot: usize,
        /// Time to sleep before exiting
        delay: Duration,
        /// Exit status reported to the parent
        code: i32,
    },
}

impl ChildTask {
    /// Run the task in the current (child) process and return its exit status.
    ///
    /// Must only be called after `fork()` in the child.
    pub fn run(&self) -> i32 {
        match self {
            ChildTask::SignalParent {
                label,
                delay,
                parent,
                signal,
            } => {
                info!("[{}] PID: {}, Parent PID: {}", label, getpid(), getppid());
                info!(
                    "[{}] Will send {} to parent after {:.1} seconds",
                    label,
                    signal,
                    delay.as_secs_f64()
                );

                std::thread::sleep(*delay);

                info!("[{}] Sending {} to parent (PID {})...", label, signal, parent);
                if let Err(e) = kill(*parent, *signal) {
                    error!("[{}] Failed to send {}: {}", label, signal, e);
                    return 1;
                }

                info!("[{}] {} sent successfully. Exiting...", label, signal);
                0
            }
            ChildTask::ExitAfter { slot, delay, code } => {
                info!(
                    "Child {}: PID = {}, Parent PID = {}",
                    slot,
                    getpid(),
                    getppid()
                );

                std::thread::sleep(*delay);

                info!("Child {} (PID {}): Terminating...", slot, getpid());
                *code
            }
        }
    }
}
