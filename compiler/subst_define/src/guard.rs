//! Reentrancy guard for evaluation hooks.
//!
//! Evaluating `A + 1` as the replacement for `A` makes the host ask the hook
//! table about `A` again. The guard turns that second request into a decline
//! instead of an unbounded recursion.

use std::cell::Cell;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum GuardState {
    #[default]
    Idle,
    InProgress,
}

/// A per-hook `Idle | InProgress` cell.
///
/// Single-threaded by construction (`Cell`), so a guard can never be shared
/// across threads and therefore never across compilations.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    state: Cell<GuardState>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        ReentrancyGuard::default()
    }

    #[inline]
    pub fn state(&self) -> GuardState {
        self.state.get()
    }

    /// Move to `InProgress`, or return `None` if already there.
    ///
    /// The returned scope restores `Idle` when dropped.
    pub fn enter(&self) -> Option<GuardScope<'_>> {
        if self.state.get() == GuardState::InProgress {
            return None;
        }
        self.state.set(GuardState::InProgress);
        Some(GuardScope { guard: self })
    }
}

/// Held for the duration of one guarded evaluation.
#[must_use = "the guard returns to Idle as soon as the scope is dropped"]
#[derive(Debug)]
pub struct GuardScope<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for GuardScope<'_> {
    fn drop(&mut self) {
        self.guard.state.set(GuardState::Idle);
    }
}
