//! Join combinator: run two futures in parallel, both must complete.
//!
//! Each progress of the outer future advances every inner future that
//! is still pending; the outer stays pending until both inners have
//! reached a terminal state. Even if one side fails early, the other is
//! driven to its own terminal state before the outer reports.
//!
//! # Failure mapping
//!
//! | Inner outcomes | Outer outcome |
//! |----------------|---------------|
//! | both complete | `Completed((ok1, ok2))` |
//! | only `f1` fails | `FutureError::JoinFut1Failed` |
//! | only `f2` fails | `FutureError::JoinFut2Failed` |
//! | both fail | `FutureError::JoinBothFailed` |

use crate::error::FutureError;
use crate::runtime::future::{Future, Step};
use crate::runtime::reactor::Reactor;
use crate::runtime::waker::Waker;

#[derive(Debug)]
enum Branch<T> {
    Running,
    Done(T),
    Failed,
}

impl<T> Branch<T> {
    const fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Parallel composition of two futures; completes with both outputs.
#[derive(Debug)]
pub struct Join<A: Future, B: Future> {
    first: A,
    second: B,
    first_branch: Branch<A::Output>,
    second_branch: Branch<B::Output>,
}

/// Runs both futures to completion and pairs their outputs.
pub fn join<A: Future, B: Future>(first: A, second: B) -> Join<A, B> {
    Join {
        first,
        second,
        first_branch: Branch::Running,
        second_branch: Branch::Running,
    }
}

impl<A: Future, B: Future> Future for Join<A, B> {
    type Output = (A::Output, B::Output);

    fn progress(&mut self, reactor: &mut Reactor, waker: &Waker) -> Step<Self::Output> {
        if self.first_branch.is_running() {
            self.first_branch = match self.first.progress(reactor, waker) {
                Step::Pending => Branch::Running,
                Step::Completed(value) => Branch::Done(value),
                Step::Failed(_) => Branch::Failed,
            };
        }
        if self.second_branch.is_running() {
            self.second_branch = match self.second.progress(reactor, waker) {
                Step::Pending => Branch::Running,
                Step::Completed(value) => Branch::Done(value),
                Step::Failed(_) => Branch::Failed,
            };
        }
        if self.first_branch.is_running() || self.second_branch.is_running() {
            return Step::Pending;
        }

        let first = std::mem::replace(&mut self.first_branch, Branch::Running);
        let second = std::mem::replace(&mut self.second_branch, Branch::Running);
        match (first, second) {
            (Branch::Done(a), Branch::Done(b)) => Step::Completed((a, b)),
            (Branch::Failed, Branch::Done(_)) => Step::Failed(FutureError::JoinFut1Failed),
            (Branch::Done(_), Branch::Failed) => Step::Failed(FutureError::JoinFut2Failed),
            (Branch::Failed, Branch::Failed) => Step::Failed(FutureError::JoinBothFailed),
            _ => unreachable!("both branches are terminal"),
        }
    }
}
