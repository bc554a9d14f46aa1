//! The future contract.
//!
//! A future is a resumable state machine exposing exactly one
//! operation: *progress once*. Each call advances the machine as far as
//! it can without blocking and reports where it ended up via [`Step`].
//! A future that returns [`Step::Pending`] must first arrange its own
//! wake-up, either by registering an I/O source with the reactor or by
//! invoking the waker directly; otherwise it will never be polled
//! again.
//!
//! `progress` must not block; the reactor's `poll` is the runtime's
//! only blocking call, and a blocking future stalls every other task on
//! the executor.

use crate::error::FutureError;
use crate::runtime::reactor::Reactor;
use crate::runtime::waker::Waker;

/// Result of one progress step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Step<T> {
    /// The future parked itself and will be woken later.
    Pending,
    /// The future finished with a value; it must not be polled again.
    Completed(T),
    /// The future failed with a code; it must not be polled again.
    Failed(FutureError),
}

impl<T> Step<T> {
    /// Returns true if the future is still in flight.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if the future reached a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    /// Applies `op` to a completed value, passing the other states
    /// through.
    pub fn map<U, F: FnOnce(T) -> U>(self, op: F) -> Step<U> {
        match self {
            Self::Pending => Step::Pending,
            Self::Completed(value) => Step::Completed(op(value)),
            Self::Failed(code) => Step::Failed(code),
        }
    }
}

/// A resumable computation driven by an executor.
pub trait Future {
    /// Value produced on completion.
    type Output;

    /// Advances the future one step.
    ///
    /// `reactor` is for registering interest in I/O readiness; `waker`
    /// re-enqueues this future's task when invoked. The executor never
    /// calls `progress` again after a terminal step.
    fn progress(&mut self, reactor: &mut Reactor, waker: &Waker) -> Step<Self::Output>;
}

/// A future that consumes an input value before its first progress.
///
/// Sequential composition pipes the upstream output into this slot; see
/// [`then`](crate::combinator::then).
pub trait Accept: Future {
    /// Value consumed from upstream.
    type Input;

    /// Supplies the input. Called at most once, before the first
    /// `progress`.
    fn accept(&mut self, input: Self::Input);
}
