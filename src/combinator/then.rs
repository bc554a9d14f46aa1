//! Then combinator: run two futures in sequence.
//!
//! `then(f1, f2)` drives `f1` to completion, pipes its output into
//! `f2`'s input slot, and continues with `f2` *in the same progress
//! call*, so a chain of immediately-ready futures completes in one
//! step.
//!
//! # Failure mapping
//!
//! | Inner outcome | Outer outcome |
//! |---------------|---------------|
//! | `f1` fails | `FutureError::ThenFut1Failed`; `f2` is never progressed |
//! | `f2` fails | `FutureError::ThenFut2Failed` |
//!
//! # Algebraic law
//!
//! `then(identity, identity)` is the identity: the input value comes
//! out unchanged.

use crate::error::FutureError;
use crate::runtime::future::{Accept, Future, Step};
use crate::runtime::reactor::Reactor;
use crate::runtime::waker::Waker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    First,
    Second,
}

/// Sequential composition of two futures.
#[derive(Debug)]
pub struct Then<A, B> {
    first: A,
    second: B,
    stage: Stage,
}

/// Chains `second` after `first`, feeding it the first output.
pub fn then<A, B>(first: A, second: B) -> Then<A, B>
where
    A: Future,
    B: Accept<Input = A::Output>,
{
    Then {
        first,
        second,
        stage: Stage::First,
    }
}

impl<A, B> Future for Then<A, B>
where
    A: Future,
    B: Accept<Input = A::Output>,
{
    type Output = B::Output;

    fn progress(&mut self, reactor: &mut Reactor, waker: &Waker) -> Step<B::Output> {
        if self.stage == Stage::First {
            match self.first.progress(reactor, waker) {
                Step::Pending => return Step::Pending,
                Step::Failed(_) => return Step::Failed(FutureError::ThenFut1Failed),
                Step::Completed(value) => {
                    self.second.accept(value);
                    self.stage = Stage::Second;
                }
            }
        }
        match self.second.progress(reactor, waker) {
            Step::Pending => Step::Pending,
            Step::Completed(value) => Step::Completed(value),
            Step::Failed(_) => Step::Failed(FutureError::ThenFut2Failed),
        }
    }
}

impl<A, B> Accept for Then<A, B>
where
    A: Accept,
    B: Accept<Input = A::Output>,
{
    type Input = A::Input;

    fn accept(&mut self, input: A::Input) {
        self.first.accept(input);
    }
}
