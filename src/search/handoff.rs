//! The shared hand-off slot.
//!
//! All cross-worker traffic goes through one rendezvous point: a slot
//! holding at most one donated task, a condition variable for waiters,
//! and the merged best solution. The mutex is held only across
//! publish/consume and the termination epilogue, never during search.
//!
//! The waiting count doubles as an atomic hint readable outside the
//! lock; donors use it to skip the mutex when nobody is waiting. It is
//! never the correctness predicate: every decision is re-checked under
//! the lock.
//!
//! Termination is quiescence: a worker that finds the slot empty while
//! every live worker is waiting has proven there is no work left. It
//! merges its local best, retires, and broadcasts so the rest observe
//! the same condition.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{Condvar, Mutex};

use crate::search::solution::Solution;
use crate::search::sumset::Sumset;

/// A donated task: seed values for both sides of a subtree root.
pub(crate) type Task = (Sumset, Sumset);

#[derive(Debug)]
struct HandoffState {
    slot: Option<Task>,
    active: usize,
    best: Solution,
}

/// Shared rendezvous for a fixed pool of search workers.
#[derive(Debug)]
pub(crate) struct Handoff {
    state: Mutex<HandoffState>,
    task_ready: Condvar,
    waiting: AtomicUsize,
}

impl Handoff {
    /// Creates the hand-off for `workers` threads with the root task
    /// already published.
    pub(crate) fn new(workers: usize, seed: Task) -> Self {
        Self {
            state: Mutex::new(HandoffState {
                slot: Some(seed),
                active: workers,
                best: Solution::default(),
            }),
            task_ready: Condvar::new(),
            waiting: AtomicUsize::new(0),
        }
    }

    /// Blocks until a task is available or the pool is quiescent.
    ///
    /// Returns `None` on quiescence; in that case the caller's local
    /// best has already been merged and its active slot retired.
    pub(crate) fn next_task(&self, local_best: &Solution) -> Option<Task> {
        let mut state = self.state.lock();
        self.waiting.fetch_add(1, Ordering::Relaxed);
        while state.slot.is_none() && self.waiting.load(Ordering::Relaxed) < state.active {
            self.task_ready.wait(&mut state);
        }
        self.waiting.fetch_sub(1, Ordering::Relaxed);

        if let Some(task) = state.slot.take() {
            return Some(task);
        }

        // Quiescent: every live worker reached the empty slot.
        state.best.merge(local_best);
        state.active -= 1;
        tracing::debug!(remaining = state.active, "worker quiesced");
        self.task_ready.notify_all();
        None
    }

    /// Termination bookkeeping for a worker exiting on an error path.
    ///
    /// Runs unconditionally on every such exit: merges the local best,
    /// retires the worker's active slot, and wakes any waiters so they
    /// can re-evaluate the quiescence condition.
    pub(crate) fn retire(&self, local_best: &Solution) {
        let mut state = self.state.lock();
        state.best.merge(local_best);
        state.active -= 1;
        tracing::debug!(remaining = state.active, "worker retired early");
        self.task_ready.notify_all();
    }

    /// Lock-free hint: is any worker currently waiting for a task?
    pub(crate) fn wants_task(&self) -> bool {
        self.waiting.load(Ordering::Relaxed) > 0
    }

    /// Publishes a donation if the slot is free.
    ///
    /// `produce` runs under the lock and only if the slot is empty; it
    /// may decline by returning `None`. Returns whether a task was
    /// published.
    pub(crate) fn offer<F>(&self, produce: F) -> bool
    where
        F: FnOnce() -> Option<Task>,
    {
        let mut state = self.state.lock();
        if state.slot.is_some() {
            return false;
        }
        match produce() {
            Some(task) => {
                state.slot = Some(task);
                self.task_ready.notify_one();
                true
            }
            None => false,
        }
    }

    /// Consumes the hand-off and returns the merged best solution.
    pub(crate) fn into_best(self) -> Solution {
        let state = self.state.into_inner();
        debug_assert_eq!(state.active, 0, "hand-off dropped with live workers");
        state.best
    }
}
