//! The executor: a single-threaded cooperative scheduler.
//!
//! The executor owns a table of spawned tasks, a shared ready list, and
//! the reactor. [`Executor::run`] repeats two moves until nothing is
//! pending:
//!
//! 1. Drain a snapshot of the ready list in LIFO order, progressing
//!    each task once. Wakes that land mid-drain are observed on the
//!    next snapshot.
//! 2. If the snapshot left the ready list empty while tasks are still
//!    pending, block in [`Reactor::poll`] until readiness events
//!    re-enqueue some of them.
//!
//! A task is enqueued at most once at any instant: the drain removes it
//! before progressing it, and only a (deduplicating) waker can put it
//! back. Wake delivery is unbounded; capacity is enforced at spawn
//! time instead, so a wake can never be dropped.

use std::rc::Rc;

use crate::config::ExecutorConfig;
use crate::error::{Error, FutureError};
use crate::runtime::future::{Future, Step};
use crate::runtime::reactor::Reactor;
use crate::runtime::task::{TaskId, TaskTable};
use crate::runtime::waker::{ReadyQueue, Waker};

/// Object-safe view of a spawned future; the output is discarded.
trait ErasedTask {
    fn progress(&mut self, reactor: &mut Reactor, waker: &Waker) -> Step<()>;
}

struct Erased<F>(F);

impl<F: Future> ErasedTask for Erased<F> {
    fn progress(&mut self, reactor: &mut Reactor, waker: &Waker) -> Step<()> {
        self.0.progress(reactor, waker).map(|_| ())
    }
}

type TaskSlot = Option<Box<dyn ErasedTask>>;

/// Drives spawned futures until all of them reach a terminal state.
pub struct Executor {
    tasks: TaskTable<TaskSlot>,
    ready: Rc<ReadyQueue>,
    reactor: Reactor,
    pending: usize,
    max_tasks: usize,
}

impl Executor {
    /// Creates an executor with configuration from the environment.
    pub fn new() -> crate::Result<Self> {
        Self::with_config(ExecutorConfig::from_env())
    }

    /// Creates an executor with explicit capacities.
    pub fn with_config(config: ExecutorConfig) -> crate::Result<Self> {
        Ok(Self {
            tasks: TaskTable::new(),
            ready: Rc::new(ReadyQueue::default()),
            reactor: Reactor::with_capacity(config.event_capacity)?,
            pending: 0,
            max_tasks: config.max_tasks,
        })
    }

    /// Number of spawned tasks that have not reached a terminal state.
    #[must_use]
    pub const fn pending(&self) -> usize {
        self.pending
    }

    /// The executor's reactor, for direct registrations in tests and
    /// hand-rolled futures.
    pub fn reactor_mut(&mut self) -> &mut Reactor {
        &mut self.reactor
    }

    /// Queues a future for execution.
    ///
    /// Every spawned future is progressed at least once before
    /// [`run`](Self::run) returns. Fails with [`Error::QueueFull`] when
    /// the executor is already tracking `max_tasks` tasks.
    pub fn spawn<F>(&mut self, future: F) -> crate::Result<TaskId>
    where
        F: Future + 'static,
    {
        if self.pending >= self.max_tasks {
            return Err(Error::QueueFull {
                capacity: self.max_tasks,
            });
        }
        let id = self.tasks.insert(Some(Box::new(Erased(future))));
        self.ready.push(id);
        self.pending += 1;
        tracing::trace!(task = ?id, pending = self.pending, "spawned");
        Ok(id)
    }

    /// Runs until every spawned future has completed or failed.
    ///
    /// A future that fails is logged and dropped; failure is an
    /// expected terminal state, not an executor error. Errors out only
    /// on reactor failures or a stall (pending tasks with no queued
    /// wake and no registered I/O source).
    pub fn run(&mut self) -> crate::Result<()> {
        while self.pending > 0 {
            let mut batch = self.ready.take();
            while let Some(id) = batch.pop() {
                self.progress_task(id);
            }
            if self.pending > 0 && self.ready.is_empty() {
                self.wait_for_events()?;
            }
        }
        Ok(())
    }

    /// Drives one unspawned future to its terminal state.
    ///
    /// The future runs on this executor's reactor and waker plumbing,
    /// so it may register I/O sources and park itself like any spawned
    /// task. Intended for driving a single composition tree; spawned
    /// tasks should use [`run`](Self::run).
    pub fn block_on<F: Future>(&mut self, mut future: F) -> crate::Result<F::Output> {
        debug_assert!(self.pending == 0, "block_on alongside spawned tasks");
        let id = self.tasks.insert(None);
        self.ready.push(id);
        let result = loop {
            let mut woken = false;
            let mut batch = self.ready.take();
            while let Some(task) = batch.pop() {
                // Anything else in the queue is a stale wake for an
                // already-removed task.
                woken |= task == id;
            }
            if woken {
                let waker = Waker::new(Rc::clone(&self.ready), id);
                match future.progress(&mut self.reactor, &waker) {
                    Step::Pending => {}
                    Step::Completed(value) => break Ok(value),
                    Step::Failed(code) => break Err(Error::Future(code)),
                }
            }
            if self.ready.is_empty() {
                if let Err(error) = self.wait_for_events() {
                    break Err(error);
                }
            }
        };
        self.tasks.remove(id);
        result
    }

    fn progress_task(&mut self, id: TaskId) {
        // A stale wake: the task completed after the wake was queued.
        let Some(slot) = self.tasks.get_mut(id) else {
            return;
        };
        let Some(mut future) = slot.take() else {
            return;
        };
        let waker = Waker::new(Rc::clone(&self.ready), id);
        match future.progress(&mut self.reactor, &waker) {
            Step::Pending => {
                if let Some(slot) = self.tasks.get_mut(id) {
                    *slot = Some(future);
                }
            }
            Step::Completed(()) => self.finish_task(id, None),
            Step::Failed(code) => self.finish_task(id, Some(code)),
        }
    }

    fn finish_task(&mut self, id: TaskId, failure: Option<FutureError>) {
        self.tasks.remove(id);
        self.pending -= 1;
        match failure {
            None => tracing::trace!(task = ?id, "completed"),
            Some(code) => tracing::warn!(task = ?id, %code, "task failed"),
        }
    }

    fn wait_for_events(&mut self) -> crate::Result<()> {
        if self.reactor.is_empty() {
            // Nothing can ever wake us: surfacing the bug beats
            // blocking forever.
            return Err(Error::Stalled {
                pending: self.pending.max(1),
            });
        }
        self.reactor.poll()?;
        Ok(())
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("pending", &self.pending)
            .field("tasks", &self.tasks.len())
            .field("max_tasks", &self.max_tasks)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::futures::{fail, from_fn, ready};
    use std::cell::Cell;

    #[test]
    fn run_progresses_every_spawned_future() {
        let mut executor = Executor::new().unwrap();
        let touched = Rc::new(Cell::new(0));

        for _ in 0..3 {
            let touched = Rc::clone(&touched);
            executor
                .spawn(from_fn(move |_reactor, _waker| {
                    touched.set(touched.get() + 1);
                    Step::Completed(())
                }))
                .unwrap();
        }
        executor.run().unwrap();
        assert_eq!(touched.get(), 3);
        assert_eq!(executor.pending(), 0);
    }

    #[test]
    fn spawn_respects_capacity() {
        let config = ExecutorConfig {
            max_tasks: 1,
            event_capacity: 8,
        };
        let mut executor = Executor::with_config(config).unwrap();
        executor.spawn(ready(())).unwrap();
        let err = executor.spawn(ready(())).unwrap_err();
        assert!(matches!(err, Error::QueueFull { capacity: 1 }));
    }

    #[test]
    fn self_wake_is_observed_on_the_next_drain() {
        let mut executor = Executor::new().unwrap();
        let polls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&polls);
        executor
            .spawn(from_fn(move |_reactor, waker| {
                counter.set(counter.get() + 1);
                if counter.get() < 3 {
                    waker.wake();
                    Step::Pending
                } else {
                    Step::Completed(())
                }
            }))
            .unwrap();
        executor.run().unwrap();
        assert_eq!(polls.get(), 3);
    }

    #[test]
    fn failed_tasks_terminate_the_run() {
        let mut executor = Executor::new().unwrap();
        executor.spawn(fail::<()>(FutureError::LeafFailed)).unwrap();
        executor.run().unwrap();
        assert_eq!(executor.pending(), 0);
    }

    #[test]
    fn drain_order_is_lifo() {
        let mut executor = Executor::new().unwrap();
        let order = Rc::new(RefCellVec::default());
        for label in 0..3 {
            let order = Rc::clone(&order);
            executor
                .spawn(from_fn(move |_reactor, _waker| {
                    order.push(label);
                    Step::Completed(())
                }))
                .unwrap();
        }
        executor.run().unwrap();
        assert_eq!(order.take(), vec![2, 1, 0]);
    }

    #[test]
    fn block_on_returns_the_value() {
        let mut executor = Executor::new().unwrap();
        assert_eq!(executor.block_on(ready(41)).unwrap(), 41);
    }

    #[test]
    fn block_on_surfaces_failure() {
        let mut executor = Executor::new().unwrap();
        let err = executor
            .block_on(fail::<u32>(FutureError::LeafFailed))
            .unwrap_err();
        assert!(matches!(err, Error::Future(FutureError::LeafFailed)));
    }

    #[test]
    fn stall_is_detected() {
        let mut executor = Executor::new().unwrap();
        // Pending without a wake source: neither self-wake nor registration.
        executor
            .spawn(from_fn(|_reactor, _waker| Step::<()>::Pending))
            .unwrap();
        let err = executor.run().unwrap_err();
        assert!(matches!(err, Error::Stalled { pending: 1 }));
    }

    #[derive(Default)]
    struct RefCellVec(std::cell::RefCell<Vec<u32>>);

    impl RefCellVec {
        fn push(&self, value: u32) {
            self.0.borrow_mut().push(value);
        }

        fn take(&self) -> Vec<u32> {
            std::mem::take(&mut self.0.borrow_mut())
        }
    }
}
