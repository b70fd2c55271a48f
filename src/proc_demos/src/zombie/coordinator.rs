//! Batch spawning and ordered reaping
//!
//! Child i (1-based) sleeps `i * step_delay` and exits with status `i`. The
//! parent then blocks on each PID in creation order, so reports come out in
//! registry order even when an earlier child outlives a later one.

use crate::{
    cli::config::ZombieDemoConfig,
    process::{ChildRegistry, ChildTask, ProcessOps, ReapOutcome, ReapRecord, WaitMode},
};
use eyre::WrapErr;
use tracing::{error, info, warn};

/// Exit status used by the child in 1-based `slot`, truncated to what a
/// wait status can carry.
pub fn exit_code_for(slot: usize) -> i32 {
    (slot & 0xff) as i32
}

/// Per-child results of one reap pass, in registry order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub records: Vec<ReapRecord>,
}

impl BatchReport {
    /// True when every registered child was reaped
    pub fn all_reaped(&self) -> bool {
        self.records.iter().all(ReapRecord::is_reaped)
    }

    /// Number of entries whose wait call failed or did not reap the child
    pub fn failures(&self) -> usize {
        self.records.iter().filter(|r| !r.is_reaped()).count()
    }

    /// Exit codes of normally-exited children, in registry order
    pub fn exit_codes(&self) -> Vec<Option<i32>> {
        self.records
            .iter()
            .map(|r| r.result.ok().and_then(|outcome| outcome.exit_code()))
            .collect()
    }
}

/// Drives the zombie-prevention demo in the parent process
pub struct ZombieCoordinator<'a, P: ProcessOps> {
    ops: &'a P,
    config: &'a ZombieDemoConfig,
    registry: ChildRegistry,
}

impl<'a, P: ProcessOps> ZombieCoordinator<'a, P> {
    pub fn new(ops: &'a P, config: &'a ZombieDemoConfig) -> Self {
        Self {
            ops,
            config,
            registry: ChildRegistry::with_capacity(config.children),
        }
    }

    pub fn registry(&self) -> &ChildRegistry {
        &self.registry
    }

    /// Fork the whole batch.
    ///
    /// The first failed fork aborts the batch; children created before it
    /// are left running and no recovery is attempted.
    pub fn spawn_batch(&mut self) -> eyre::Result<()> {
        info!("Creating {} child processes...", self.config.children);

        for slot in 1..=self.config.children {
            let task = ChildTask::ExitAfter {
                slot,
                delay: self.config.delay_for(slot),
                code: exit_code_for(slot),
            };

            let pid = self
                .ops
                .spawn(&task)
                .wrap_err_with(|| format!("Fork failed for child {}", slot))?;
            self.registry.record(pid, format!("Child {}", slot))?;
            info!("Parent: Created child {} with PID = {}", slot, pid);
        }

        Ok(())
    }

    /// Block on each registered child in creation order and report how it
    /// terminated.
    ///
    /// A failing wait call is reported and skipped; the pass always visits
    /// every entry exactly once.
    pub fn reap_batch(&self) -> BatchReport {
        info!("Parent: Waiting for all children to terminate...");

        let mut records = Vec::with_capacity(self.registry.len());
        for entry in self.registry.iter() {
            info!(
                "Parent: Waiting for child {} (PID {})...",
                entry.slot, entry.pid
            );

            let result = self.ops.reap(entry.pid, WaitMode::Blocking);
            match &result {
                Ok(outcome) if outcome.is_reaped() => {
                    info!(
                        "Parent: Cleaned up child {} (PID {}): {}",
                        entry.slot, entry.pid, outcome
                    );
                }
                Ok(ReapOutcome::NoSuchChild) => {
                    error!(
                        "waitpid failed for child {} (PID {}): no such child",
                        entry.slot, entry.pid
                    );
                }
                Ok(outcome) => {
                    warn!(
                        "Parent: Child {} (PID {}) {}, not reaped",
                        entry.slot, entry.pid, outcome
                    );
                }
                Err(e) => {
                    error!(
                        "waitpid failed for child {} (PID {}): {}",
                        entry.slot, entry.pid, e
                    );
                }
            }

            records.push(ReapRecord {
                slot: entry.slot,
                pid: entry.pid,
                result,
            });
        }

        BatchReport { records }
    }
}
