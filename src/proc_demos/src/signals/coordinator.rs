//! Signal demo coordination
//!
//! The parent installs SIGTERM/SIGINT handlers, forks two timed senders,
//! suspends until both latches are set, then makes a non-blocking pass over
//! its children.
//!
//! # Design
//! - Handlers never print; the main task reports each signal after the
//!   notification stream yields it
//! - The wait loop blocks on the stream; the heartbeat is progress output only
//! - Cleanup never blocks on a child that is still running

use super::latch::{SignalLatches, TerminationSignal};
use crate::{
    cli::config::SignalDemoConfig,
    process::{ChildRegistry, ChildTask, ProcessOps, ReapOutcome, ReapRecord, WaitMode},
};
use eyre::WrapErr;
use futures::stream::{Stream, StreamExt};
use nix::unistd::Pid;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Number of timed signal senders
const SENDER_COUNT: usize = 2;

/// Interval between non-blocking reap attempts while a cleanup grace period runs
const CLEANUP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What happened while waiting for both termination signals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaitSummary {
    /// Heartbeat iterations emitted while waiting
    pub heartbeats: u64,
    /// Signals in the order their latch was set
    pub handled: Vec<TerminationSignal>,
    /// Deliveries of a signal whose latch was already set
    pub duplicates: usize,
}

/// Drives the signal demo in the parent process
pub struct SignalCoordinator<'a, P: ProcessOps> {
    ops: &'a P,
    config: &'a SignalDemoConfig,
    latches: SignalLatches,
    registry: ChildRegistry,
}

impl<'a, P: ProcessOps> SignalCoordinator<'a, P> {
    pub fn new(ops: &'a P, config: &'a SignalDemoConfig) -> Self {
        Self {
            ops,
            config,
            latches: SignalLatches::new(),
            registry: ChildRegistry::with_capacity(SENDER_COUNT),
        }
    }

    pub fn latches(&self) -> &SignalLatches {
        &self.latches
    }

    pub fn registry(&self) -> &ChildRegistry {
        &self.registry
    }

    /// Fork child 1 (SIGTERM after `sigterm_delay`) and child 2 (SIGINT after
    /// `sigint_delay`), both targeting `parent`.
    ///
    /// A failed fork is returned immediately; the caller treats it as fatal.
    pub fn spawn_senders(&mut self, parent: Pid) -> eyre::Result<()> {
        let senders = [
            (TerminationSignal::Term, self.config.sigterm_delay()),
            (TerminationSignal::Int, self.config.sigint_delay()),
        ];

        for (index, (signal, delay)) in senders.into_iter().enumerate() {
            let number = index + 1;
            let task = ChildTask::SignalParent {
                label: format!("CHILD {}", number),
                delay,
                parent,
                signal: signal.signal(),
            };

            let pid = self
                .ops
                .spawn(&task)
                .wrap_err_with(|| format!("Fork failed for child {}", number))?;
            self.registry.record(pid, format!("Child {}", number))?;

            info!(
                "[PARENT] Created Child {} (PID {}) - Will send {} in {:.1}s",
                number,
                pid,
                signal,
                delay.as_secs_f64()
            );
        }

        Ok(())
    }

    /// Suspend until both latches are set.
    ///
    /// Emits a heartbeat line every `heartbeat_interval`. If `signals` ends
    /// before both latches are set, the loop keeps waiting (it never exits
    /// on a single signal).
    pub async fn wait_for_signals<S>(&self, signals: S) -> WaitSummary
    where
        S: Stream<Item = TerminationSignal>,
    {
        tokio::pin!(signals);

        let mut heartbeat = tokio::time::interval(self.config.heartbeat_interval());
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut summary = WaitSummary::default();
        let mut stream_open = true;

        while !self.latches.both_set() {
            tokio::select! {
                biased;  // Observe signals before reporting progress

                received = signals.next(), if stream_open => {
                    match received {
                        Some(signal) => self.observe(signal, &mut summary),
                        None => {
                            warn!("[PARENT] Signal stream closed; no further signals can arrive");
                            stream_open = false;
                        }
                    }
                }

                _ = heartbeat.tick() => {
                    summary.heartbeats += 1;
                    info!("[PARENT] Working... (iteration {})", summary.heartbeats);
                    self.report_partial();
                }
            }
        }

        info!("[PARENT] Both signals (SIGTERM and SIGINT) received!");
        summary
    }

    /// Set the latch for `signal` and report it, once per signal
    fn observe(&self, signal: TerminationSignal, summary: &mut WaitSummary) {
        if !self.latches.latch(signal) {
            summary.duplicates += 1;
            debug!("[PARENT] {} already latched, ignoring repeated delivery", signal);
            return;
        }
        summary.handled.push(signal);

        info!(
            "[PARENT] Received {} (signal {})",
            signal,
            signal.signal() as i32
        );
        match signal {
            TerminationSignal::Term => {
                info!("[PARENT] Handling SIGTERM: Performing cleanup operations...");
                info!("[PARENT] Cleanup complete. SIGTERM marked as received.");
            }
            TerminationSignal::Int => {
                info!("[PARENT] Handling SIGINT: Saving state and preparing to exit...");
                info!("[PARENT] State saved. SIGINT marked as received.");
            }
        }
    }

    fn report_partial(&self) {
        let term = self.latches.is_set(TerminationSignal::Term);
        let int = self.latches.is_set(TerminationSignal::Int);
        match (term, int) {
            (true, false) => info!("[PARENT] SIGTERM received, but still waiting for SIGINT..."),
            (false, true) => info!("[PARENT] SIGINT received, but still waiting for SIGTERM..."),
            _ => {}
        }
    }

    /// Non-blocking reap of every registered child, in registry order.
    ///
    /// Children that have not exited are skipped. With a non-zero
    /// `cleanup_grace`, skipped children are polled again until the grace
    /// period runs out. Returns one record per child whose wait call
    /// returned something other than "not ready".
    pub async fn cleanup(&self) -> Vec<ReapRecord> {
        info!("[PARENT] Cleaning up child processes...");

        // `None` when the grace reaches past what the clock can represent
        let deadline = Instant::now().checked_add(self.config.cleanup_grace());
        let mut pending: Vec<_> = self.registry.iter().collect();
        let mut records = Vec::with_capacity(pending.len());

        loop {
            pending.retain(|entry| {
                let result = self.ops.reap(entry.pid, WaitMode::NonBlocking);
                match &result {
                    Ok(ReapOutcome::NotReady) => {
                        debug!("[PARENT] {} (PID {}) has not exited yet", entry.label, entry.pid);
                        return true;
                    }
                    Ok(outcome) if outcome.is_reaped() => {
                        info!(
                            "[PARENT] {} (PID {}) cleaned up: {}",
                            entry.label, entry.pid, outcome
                        );
                    }
                    Ok(outcome) => {
                        warn!(
                            "[PARENT] {} (PID {}) not reaped: {}",
                            entry.label, entry.pid, outcome
                        );
                    }
                    Err(e) => {
                        warn!(
                            "[PARENT] waitpid failed for {} (PID {}): {}",
                            entry.label, entry.pid, e
                        );
                    }
                }
                records.push(ReapRecord {
                    slot: entry.slot,
                    pid: entry.pid,
                    result,
                });
                false
            });

            let expired = deadline.is_some_and(|deadline| Instant::now() >= deadline);
            if pending.is_empty() || expired {
                break;
            }
            tokio::time::sleep(CLEANUP_POLL_INTERVAL).await;
        }

        for entry in pending {
            debug!(
                "[PARENT] {} (PID {}) still running, not waiting further",
                entry.label, entry.pid
            );
        }

        records
    }
}
