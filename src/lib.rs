//! Splitsum: parallel equal-sum subset search and a cooperative I/O runtime.
//!
//! # Overview
//!
//! The crate contains two independent cores that share an error taxonomy
//! and configuration layer:
//!
//! - [`search`]: a branch-and-bound search for a pair of disjoint subsets of
//!   `{1..d}` with equal, maximal sum. The search tree is explored
//!   iteratively on an explicit frame stack; a fixed pool of worker threads
//!   shares unexplored subtrees through a single hand-off slot.
//! - [`runtime`]: a single-threaded cooperative executor built from three
//!   primitives: a resumable [`Future`](runtime::Future), an executor with a
//!   LIFO ready queue, and a reactor mapping I/O readiness to wake-ups.
//! - [`combinator`]: `then`, `join`, and `select` composition of futures
//!   with a fixed failure-code mapping.
//!
//! # Core Guarantees
//!
//! - **Deterministic value**: the search's best sum is independent of the
//!   worker count; only the winning pair may differ.
//! - **No slot leaks**: every arena handle is released by the frame that
//!   owns it; a worker's arena is pristine after each task.
//! - **Single enqueue**: a future is never queued twice at once; stale
//!   wakes for completed tasks are ignored via generational task ids.
//! - **No blocking in `progress`**: the reactor's `poll` is the only
//!   blocking call in the runtime.
//!
//! # Module Structure
//!
//! - [`search`]: sumsets, arena, frames, hand-off, workers, solver
//! - [`runtime`]: future contract, executor, waker, reactor, leaf futures
//! - [`combinator`]: `then` / `join` / `select`
//! - [`config`]: environment-driven capacity knobs
//! - [`error`]: error types

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]

pub mod combinator;
pub mod config;
pub mod error;
pub mod runtime;
pub mod search;

pub use config::{ExecutorConfig, SolverConfig};
pub use error::{Error, FutureError, Result};
pub use runtime::{Executor, Future, Interest, Reactor, Step, TaskId, Waker};
pub use search::{InputData, Solution, Solver, Sumset};
