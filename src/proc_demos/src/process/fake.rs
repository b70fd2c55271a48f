//! Scripted [`ProcessOps`] for coordinator tests

use super::{
    child::ChildTask,
    reap::{ReapOutcome, WaitMode},
    spawner::ProcessOps,
};
use nix::{errno::Errno, unistd::Pid};
use std::{cell::RefCell, collections::HashMap};

/// Exit status `task` reports when it runs to completion
fn exit_code_of(task: &ChildTask) -> i32 {
    match task {
        ChildTask::SignalParent { .. } => 0,
        ChildTask::ExitAfter { code, .. } => *code,
    }
}

#[derive(Default)]
struct FakeState {
    next_pid: i32,
    spawn_attempts: usize,
    tasks: Vec<(Pid, ChildTask)>,
    /// Non-blocking reaps that still report `NotReady`, per PID
    not_ready_polls: HashMap<Pid, usize>,
    wait_errors: HashMap<Pid, Errno>,
    reaped: Vec<Pid>,
    reap_calls: Vec<(Pid, WaitMode)>,
}

/// Fake process layer: "children" exit with their task's exit code as soon
/// as they are waited on, unless scripted otherwise.
pub(crate) struct FakeProcessOps {
    fail_spawn_at: Option<usize>,
    state: RefCell<FakeState>,
}

impl FakeProcessOps {
    pub(crate) fn new() -> Self {
        Self {
            fail_spawn_at: None,
            state: RefCell::new(FakeState {
                next_pid: 1000,
                ..Default::default()
            }),
        }
    }

    /// Fail the n-th spawn attempt (1-based) with `EAGAIN`
    pub(crate) fn fail_spawn_at(mut self, attempt: usize) -> Self {
        self.fail_spawn_at = Some(attempt);
        self
    }

    /// PID that the n-th successful spawn (1-based) will receive
    pub(crate) fn pid_for(&self, nth: usize) -> Pid {
        Pid::from_raw(1000 + nth as i32)
    }

    /// Keep `pid` running for `polls` non-blocking reaps
    pub(crate) fn still_running_for(&self, pid: Pid, polls: usize) {
        self.state.borrow_mut().not_ready_polls.insert(pid, polls);
    }

    /// Make every wait on `pid` fail with `errno`
    pub(crate) fn fail_wait(&self, pid: Pid, errno: Errno) {
        self.state.borrow_mut().wait_errors.insert(pid, errno);
    }

    pub(crate) fn tasks(&self) -> Vec<(Pid, ChildTask)> {
        self.state.borrow().tasks.clone()
    }

    pub(crate) fn reap_calls(&self) -> Vec<(Pid, WaitMode)> {
        self.state.borrow().reap_calls.clone()
    }
}

impl ProcessOps for FakeProcessOps {
    fn spawn(&self, task: &ChildTask) -> eyre::Result<Pid> {
        let mut state = self.state.borrow_mut();
        state.spawn_attempts += 1;
        if self.fail_spawn_at == Some(state.spawn_attempts) {
            return Err(eyre::Report::new(Errno::EAGAIN).wrap_err("fork failed"));
        }

        state.next_pid += 1;
        let pid = Pid::from_raw(state.next_pid);
        state.tasks.push((pid, task.clone()));
        Ok(pid)
    }

    fn reap(&self, pid: Pid, mode: WaitMode) -> nix::Result<ReapOutcome> {
        let mut state = self.state.borrow_mut();
        state.reap_calls.push((pid, mode));

        if let Some(errno) = state.wait_errors.get(&pid) {
            return Err(*errno);
        }
        if state.reaped.contains(&pid) {
            return Ok(ReapOutcome::NoSuchChild);
        }
        let Some(code) = state
            .tasks
            .iter()
            .find(|(task_pid, _)| *task_pid == pid)
            .map(|(_, task)| exit_code_of(task))
        else {
            return Ok(ReapOutcome::NoSuchChild);
        };

        if mode == WaitMode::NonBlocking {
            if let Some(polls) = state.not_ready_polls.get_mut(&pid) {
                if *polls > 0 {
                    *polls -= 1;
                    return Ok(ReapOutcome::NotReady);
                }
            }
        }

        state.reaped.push(pid);
        Ok(ReapOutcome::Exited { pid, code })
    }
}
