//! Process creation and reaping behind a trait seam
//!
//! Coordinators talk to the OS only through [`ProcessOps`], so tests can
//! drive them with a scripted fake instead of real forks and sleeps.

use super::{
    child::ChildTask,
    reap::{wait_for, ReapOutcome, WaitMode},
};
use eyre::WrapErr;
use nix::unistd::{fork, ForkResult, Pid};
use std::io::Write;
use tracing::debug;

/// OS operations needed by the coordinators
pub trait ProcessOps {
    /// Create a child that runs `task` and exits with its status.
    ///
    /// Returns the child's PID in the parent. Never returns in the child.
    fn spawn(&self, task: &ChildTask) -> eyre::Result<Pid>;

    /// Wait on one specific child
    fn reap(&self, pid: Pid, mode: WaitMode) -> nix::Result<ReapOutcome>;
}

/// [`ProcessOps`] backed by `fork(2)` and `waitpid(2)`
///
/// Fork is only sound while the caller is single-threaded, which is how both
/// demo binaries run.
#[derive(Debug, Default, Clone, Copy)]
pub struct ForkProcessOps;

impl ProcessOps for ForkProcessOps {
    fn spawn(&self, task: &ChildTask) -> eyre::Result<Pid> {
        // Flush before forking so buffered output isn't duplicated in the child
        std::io::stdout().flush().ok();

        // SAFETY: the child only sleeps, sends a signal and exits; it never
        // returns into the caller's stack or touches the async runtime.
        match unsafe { fork() }.wrap_err("fork failed")? {
            ForkResult::Parent { child } => {
                debug!("Forked child PID {} for {:?}", child, task);
                Ok(child)
            }
            ForkResult::Child => {
                let code = task.run();
                std::io::stdout().flush().ok();
                std::process::exit(code);
            }
        }
    }

    fn reap(&self, pid: Pid, mode: WaitMode) -> nix::Result<ReapOutcome> {
        wait_for(pid, mode)
    }
}
