#![allow(dead_code)]

use nix::{
    sys::signal::{killpg, Signal},
    unistd::{setsid, Pid},
};
use std::{
    io,
    os::unix::process::CommandExt,
    path::Path,
    process::{Child, Command, ExitStatus, Stdio},
    time::Duration,
};

/// Grace period between SIGTERM and SIGKILL when tearing a demo down
const TERMINATION_GRACE_PERIOD: Duration = Duration::from_millis(200);

/// RAII wrapper that runs a demo in its own session and kills the whole
/// process group on drop, so forked children never outlive a test.
pub struct ManagedProcess {
    child: Child,
    pgid: Pid,
}

impl ManagedProcess {
    /// Spawn `cmd` as a new session leader with stdout/stderr sent to `log`.
    pub fn spawn(cmd: &mut Command, log: &Path) -> io::Result<Self> {
        let stdout = std::fs::File::create(log)?;
        let stderr = stdout.try_clone()?;
        cmd.stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .env_remove("RUST_LOG");

        // Safety: setsid() is async-signal-safe and only affects the child.
        unsafe {
            cmd.pre_exec(|| {
                setsid()?;
                Ok(())
            });
        }

        let child = cmd.spawn()?;
        let pgid = Pid::from_raw(child.id() as i32);
        Ok(Self { child, pgid })
    }

    /// Return the PID of the child process.
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    pub fn try_wait(&mut self) -> io::Result<Option<ExitStatus>> {
        self.child.try_wait()
    }

    /// Poll until the process exits or `timeout` elapses.
    pub fn wait_timeout(&mut self, timeout: Duration) -> io::Result<Option<ExitStatus>> {
        let start = std::time::Instant::now();
        while start.elapsed() < timeout {
            if let Some(status) = self.child.try_wait()? {
                return Ok(Some(status));
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        Ok(None)
    }
}

impl Drop for ManagedProcess {
    fn drop(&mut self) {
        if let Ok(Some(_)) = self.child.try_wait() {
            // Leader is gone; still sweep any children left in the group
            let _ = killpg(self.pgid, Signal::SIGKILL);
            return;
        }
        let _ = killpg(self.pgid, Signal::SIGTERM);
        std::thread::sleep(TERMINATION_GRACE_PERIOD);
        let _ = killpg(self.pgid, Signal::SIGKILL);
        // Reap zombie.
        let _ = self.child.wait();
    }
}

/// Lines of a captured log, in order
pub fn read_lines(log: &Path) -> Vec<String> {
    std::fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
