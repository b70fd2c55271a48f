//! Fixed-capacity, append-only registry of forked children

use eyre::bail;
use nix::unistd::Pid;

/// One registered child
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    /// 1-based creation order
    pub slot: usize,
    /// Process ID returned by fork
    pub pid: Pid,
    /// Label used in log lines
    pub label: String,
}

/// Ordered process IDs, written once after each successful fork
///
/// Entries are never removed or rewritten; cleanup walks them in creation
/// order.
#[derive(Debug)]
pub struct ChildRegistry {
    entries: Vec<ChildEntry>,
    capacity: usize,
}

impl ChildRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a newly forked child in the next free slot
    pub fn record(&mut self, pid: Pid, label: impl Into<String>) -> eyre::Result<&ChildEntry> {
        if self.entries.len() >= self.capacity {
            bail!(
                "child registry is full ({} entries), cannot record PID {}",
                self.capacity,
                pid
            );
        }
        if self.entries.iter().any(|entry| entry.pid == pid) {
            bail!("PID {} is already registered", pid);
        }

        let slot = self.entries.len() + 1;
        self.entries.push(ChildEntry {
            slot,
            pid,
            label: label.into(),
        });
        Ok(&self.entries[slot - 1])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChildEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Process IDs in creation order
    pub fn pids(&self) -> Vec<Pid> {
        self.entries.iter().map(|entry| entry.pid).collect()
    }
}
