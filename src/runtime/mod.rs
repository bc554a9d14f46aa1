//! The cooperative runtime: future contract, executor, reactor, wakers.
//!
//! Exactly one thread drives everything. Futures suspend by returning
//! [`Step::Pending`] after arranging a wake-up; the executor parks in
//! the reactor's `poll` when the ready list runs dry. See the module
//! docs of [`executor`] and [`reactor`] for the scheduling and
//! readiness protocols.

pub mod executor;
pub mod future;
pub mod futures;
pub mod reactor;
pub mod task;
pub mod waker;

pub use executor::Executor;
pub use future::{Accept, Future, Step};
pub use reactor::{Interest, Reactor};
pub use task::TaskId;
pub use waker::Waker;
