//! Select combinator: run two futures in parallel, first success wins.
//!
//! Each progress advances every inner future still in the race; the
//! first completion ends it, tagged with which side won. When both
//! complete in the same progress call, the first future wins the tie.
//!
//! A one-sided failure does not end the race: the failed side is
//! remembered and dropped from further polling, and the outer keeps
//! driving the survivor alone. Only when both sides have failed does
//! the outer fail, with `FutureError::SelectBothFailed`. The losing
//! side of a successful race is not cancelled; it is simply never
//! progressed again.

use crate::error::FutureError;
use crate::runtime::future::{Future, Step};
use crate::runtime::reactor::Reactor;
use crate::runtime::waker::Waker;

/// The winning side of a [`select`], carrying its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selected<A, B> {
    /// The first future completed first.
    First(A),
    /// The second future completed first.
    Second(B),
}

/// Parallel race of two futures.
#[derive(Debug)]
pub struct Select<A, B> {
    first: A,
    second: B,
    first_alive: bool,
    second_alive: bool,
}

/// Races both futures; the first to complete supplies the output.
pub fn select<A: Future, B: Future>(first: A, second: B) -> Select<A, B> {
    Select {
        first,
        second,
        first_alive: true,
        second_alive: true,
    }
}

impl<A: Future, B: Future> Future for Select<A, B> {
    type Output = Selected<A::Output, B::Output>;

    fn progress(&mut self, reactor: &mut Reactor, waker: &Waker) -> Step<Self::Output> {
        // Advance every side still in the race before judging, so a
        // same-call tie exists to be broken.
        let first_step = self
            .first_alive
            .then(|| self.first.progress(reactor, waker));
        let second_step = self
            .second_alive
            .then(|| self.second.progress(reactor, waker));

        match first_step {
            Some(Step::Completed(value)) => return Step::Completed(Selected::First(value)),
            Some(Step::Failed(_)) => self.first_alive = false,
            _ => {}
        }
        match second_step {
            Some(Step::Completed(value)) => return Step::Completed(Selected::Second(value)),
            Some(Step::Failed(_)) => self.second_alive = false,
            _ => {}
        }
        if !self.first_alive && !self.second_alive {
            return Step::Failed(FutureError::SelectBothFailed);
        }
        Step::Pending
    }
}
