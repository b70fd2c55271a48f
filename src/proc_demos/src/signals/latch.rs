//! One-shot latches for the two termination signals

use nix::sys::signal::Signal;
use std::{
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};

/// The two termination signals the signal demo waits for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationSignal {
    /// SIGTERM
    Term,
    /// SIGINT
    Int,
}

impl TerminationSignal {
    pub const ALL: [TerminationSignal; 2] = [TerminationSignal::Term, TerminationSignal::Int];

    pub fn signal(self) -> Signal {
        match self {
            TerminationSignal::Term => Signal::SIGTERM,
            TerminationSignal::Int => Signal::SIGINT,
        }
    }

    pub fn kind(self) -> tokio::signal::unix::SignalKind {
        match self {
            TerminationSignal::Term => tokio::signal::unix::SignalKind::terminate(),
            TerminationSignal::Int => tokio::signal::unix::SignalKind::interrupt(),
        }
    }
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signal())
    }
}

/// Owned pair of latches, one per [`TerminationSignal`]
///
/// A latch goes from unset to set exactly once and is never cleared.
#[derive(Debug, Default)]
pub struct SignalLatches {
    term: AtomicBool,
    int: AtomicBool,
}

impl SignalLatches {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, signal: TerminationSignal) -> &AtomicBool {
        match signal {
            TerminationSignal::Term => &self.term,
            TerminationSignal::Int => &self.int,
        }
    }

    /// Set the latch for `signal`.
    ///
    /// Returns `true` only for the call that performed the unset -> set
    /// transition.
    pub fn latch(&self, signal: TerminationSignal) -> bool {
        !self.slot(signal).swap(true, Ordering::AcqRel)
    }

    pub fn is_set(&self, signal: TerminationSignal) -> bool {
        self.slot(signal).load(Ordering::Acquire)
    }

    pub fn both_set(&self) -> bool {
        TerminationSignal::ALL.iter().all(|&s| self.is_set(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latch_transitions_once() {
        let latches = SignalLatches::new();
        assert!(!latches.is_set(TerminationSignal::Term));

        assert!(latches.latch(TerminationSignal::Term));
        assert!(!latches.latch(TerminationSignal::Term));
        assert!(latches.is_set(TerminationSignal::Term));
    }

    #[test]
    fn test_latches_are_independent() {
        let latches = SignalLatches::new();
        latches.latch(TerminationSignal::Int);

        assert!(latches.is_set(TerminationSignal::Int));
        assert!(!latches.is_set(TerminationSignal::Term));
        assert!(!latches.both_set());

        latches.latch(TerminationSignal::Term);
        assert!(latches.both_set());
    }

    #[test]
    fn test_latch_stays_set() {
        let latches = SignalLatches::new();
        latches.latch(TerminationSignal::Term);
        for _ in 0..10 {
            latches.latch(TerminationSignal::Int);
            assert!(latches.is_set(TerminationSignal::Term));
        }
    }

    #[test]
    fn test_display_uses_signal_name() {
        assert_eq!(TerminationSignal::Term.to_string(), "SIGTERM");
        assert_eq!(TerminationSignal::Int.to_string(), "SIGINT");
    }
}
