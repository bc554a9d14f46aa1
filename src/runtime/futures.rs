//! Leaf futures: the small building blocks compositions bottom out in.

use std::os::unix::io::RawFd;

use crate::error::FutureError;
use crate::runtime::future::{Accept, Future, Step};
use crate::runtime::reactor::{Interest, Reactor};
use crate::runtime::waker::Waker;

/// Future that completes immediately with a value.
#[derive(Debug)]
pub struct Ready<T>(Option<T>);

/// Creates a future that completes with `value` on its first progress.
pub fn ready<T>(value: T) -> Ready<T> {
    Ready(Some(value))
}

impl<T> Future for Ready<T> {
    type Output = T;

    fn progress(&mut self, _reactor: &mut Reactor, _waker: &Waker) -> Step<T> {
        Step::Completed(self.0.take().expect("ready future progressed twice"))
    }
}

/// Future that fails immediately.
#[derive(Debug)]
pub struct Fail<T> {
    code: FutureError,
    _output: std::marker::PhantomData<fn() -> T>,
}

/// Creates a future that fails with `code` on its first progress.
pub fn fail<T>(code: FutureError) -> Fail<T> {
    Fail {
        code,
        _output: std::marker::PhantomData,
    }
}

impl<T> Future for Fail<T> {
    type Output = T;

    fn progress(&mut self, _reactor: &mut Reactor, _waker: &Waker) -> Step<T> {
        Step::Failed(self.code)
    }
}

/// Future defined by a closure over the progress arguments.
#[derive(Debug)]
pub struct FromFn<F>(F);

/// Wraps a closure as a future; each progress call invokes it once.
pub fn from_fn<T, F>(op: F) -> FromFn<F>
where
    F: FnMut(&mut Reactor, &Waker) -> Step<T>,
{
    FromFn(op)
}

impl<T, F> Future for FromFn<F>
where
    F: FnMut(&mut Reactor, &Waker) -> Step<T>,
{
    type Output = T;

    fn progress(&mut self, reactor: &mut Reactor, waker: &Waker) -> Step<T> {
        (self.0)(reactor, waker)
    }
}

/// Future that applies a function to an input supplied by composition.
#[derive(Debug)]
pub struct Apply<F, I> {
    op: Option<F>,
    input: Option<I>,
}

/// Creates a future that completes with `op(input)` once an upstream
/// future has supplied the input (see [`then`](crate::combinator::then)).
pub fn apply<F, I, T>(op: F) -> Apply<F, I>
where
    F: FnOnce(I) -> T,
{
    Apply {
        op: Some(op),
        input: None,
    }
}

impl<F, I, T> Future for Apply<F, I>
where
    F: FnOnce(I) -> T,
{
    type Output = T;

    fn progress(&mut self, _reactor: &mut Reactor, _waker: &Waker) -> Step<T> {
        let input = self.input.take().expect("apply progressed before its input");
        let op = self.op.take().expect("apply progressed twice");
        Step::Completed(op(input))
    }
}

impl<F, I, T> Accept for Apply<F, I>
where
    F: FnOnce(I) -> T,
{
    type Input = I;

    fn accept(&mut self, input: I) {
        self.input = Some(input);
    }
}

/// Future that completes once a file descriptor becomes readable.
///
/// Registers on first progress and unregisters before completing, so
/// its registration never outlives its pending state.
#[derive(Debug)]
pub struct Readable {
    fd: RawFd,
    registered: bool,
}

impl Readable {
    /// Creates a readiness future for `fd`.
    #[must_use]
    pub const fn new(fd: RawFd) -> Self {
        Self {
            fd,
            registered: false,
        }
    }
}

impl Future for Readable {
    type Output = ();

    fn progress(&mut self, reactor: &mut Reactor, waker: &Waker) -> Step<()> {
        if self.registered {
            self.registered = false;
            if let Err(error) = reactor.unregister(self.fd) {
                tracing::warn!(fd = self.fd, %error, "unregister failed");
                return Step::Failed(FutureError::LeafFailed);
            }
            return Step::Completed(());
        }
        match reactor.register(self.fd, Interest::READABLE, waker.clone()) {
            Ok(()) => {
                self.registered = true;
                Step::Pending
            }
            Err(error) => {
                tracing::warn!(fd = self.fd, %error, "register failed");
                Step::Failed(FutureError::LeafFailed)
            }
        }
    }
}
