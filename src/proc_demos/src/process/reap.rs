//! Reaping children and decoding their termination status

use nix::{
    errno::Errno,
    sys::{
        signal::Signal,
        wait::{waitpid, WaitPidFlag, WaitStatus},
    },
    unistd::Pid,
};
use std::fmt;
use tracing::debug;

/// Whether a wait call may suspend the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitMode {
    /// Suspend until the child changes state
    Blocking,
    /// Return immediately (`WNOHANG`)
    NonBlocking,
}

impl WaitMode {
    fn flags(self) -> Option<WaitPidFlag> {
        match self {
            WaitMode::Blocking => None,
            WaitMode::NonBlocking => Some(WaitPidFlag::WNOHANG),
        }
    }
}

/// Decoded result of a single wait call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReapOutcome {
    /// Child exited normally with `code` (0..=255)
    Exited { pid: Pid, code: i32 },
    /// Child was terminated by `signal`
    Signaled {
        pid: Pid,
        signal: Signal,
        core_dumped: bool,
    },
    /// Non-blocking wait: the child has not terminated yet
    NotReady,
    /// No such child (never ours, or already reaped)
    NoSuchChild,
    /// Stop/continue/ptrace state changes, which these demos do not model
    Unmodeled { pid: Option<Pid> },
}

impl ReapOutcome {
    /// True when the wait call retrieved a termination status and the
    /// process-table entry is gone.
    pub fn is_reaped(&self) -> bool {
        matches!(
            self,
            ReapOutcome::Exited { .. } | ReapOutcome::Signaled { .. }
        )
    }

    /// Exit code if the child exited normally
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ReapOutcome::Exited { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for ReapOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReapOutcome::Exited { code, .. } => write!(f, "exited normally with code {}", code),
            ReapOutcome::Signaled {
                signal,
                core_dumped,
                ..
            } => {
                write!(f, "terminated by signal {} ({})", *signal as i32, signal)?;
                if *core_dumped {
                    write!(f, ", core dumped")?;
                }
                Ok(())
            }
            ReapOutcome::NotReady => write!(f, "still running"),
            ReapOutcome::NoSuchChild => write!(f, "no such child"),
            ReapOutcome::Unmodeled { .. } => write!(f, "changed state without terminating"),
        }
    }
}

/// Outcome of reaping one registry entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReapRecord {
    /// 1-based registry slot
    pub slot: usize,
    /// Process ID that was waited on
    pub pid: Pid,
    /// Decoded outcome, or the errno of a failed wait call
    pub result: Result<ReapOutcome, Errno>,
}

impl ReapRecord {
    /// True when the entry was reaped successfully
    pub fn is_reaped(&self) -> bool {
        matches!(&self.result, Ok(outcome) if outcome.is_reaped())
    }
}

/// Translate a raw `WaitStatus` into a [`ReapOutcome`]
pub fn decode_wait_status(status: WaitStatus) -> ReapOutcome {
    match status {
        WaitStatus::Exited(pid, code) => ReapOutcome::Exited { pid, code },
        WaitStatus::Signaled(pid, signal, core_dumped) => ReapOutcome::Signaled {
            pid,
            signal,
            core_dumped,
        },
        WaitStatus::StillAlive => ReapOutcome::NotReady,
        other => ReapOutcome::Unmodeled { pid: other.pid() },
    }
}

/// Wait on exactly one child.
///
/// `ECHILD` is reported as [`ReapOutcome::NoSuchChild`] rather than an error,
/// so a second reap of the same PID is distinguishable from a child that is
/// still running. `EINTR` restarts the call.
pub fn wait_for(pid: Pid, mode: WaitMode) -> nix::Result<ReapOutcome> {
    loop {
        match waitpid(pid, mode.flags()) {
            Ok(status) => {
                debug!("waitpid({}, {:?}) -> {:?}", pid, mode, status);
                return Ok(decode_wait_status(status));
            }
            Err(Errno::EINTR) => {
                debug!("waitpid({}) interrupted, restarting", pid);
            }
            Err(Errno::ECHILD) => {
                debug!("waitpid({}) -> ECHILD", pid);
                return Ok(ReapOutcome::NoSuchChild);
            }
            Err(e) => return Err(e),
        }
    }
}
