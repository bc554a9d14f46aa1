//! Error types and error-handling strategy.
//!
//! Two families of errors live here, and keeping them apart is the point:
//!
//! - [`Error`] covers *system* failures: malformed input, an exhausted
//!   sumset arena, an executor at capacity, I/O failures from the
//!   reactor. These propagate with `?` and terminate the operation that
//!   hit them.
//! - [`FutureError`] covers *expected* control-flow signals: the failure
//!   codes a combinator surfaces when one of its inner futures fails.
//!   They are values a caller matches on, not conditions to report.

use thiserror::Error;

/// Convenience alias for results using the crate error type.
pub type Result<T> = std::result::Result<T, Error>;

/// A system failure in either core.
#[derive(Debug, Error)]
pub enum Error {
    /// The input stream did not match the expected format.
    #[error("parse error on line {line}: {reason}")]
    Parse {
        /// 1-based line number of the offending input line.
        line: usize,
        /// Why the line was rejected.
        reason: String,
    },

    /// A worker's sumset arena ran out of slots.
    #[error("sumset arena exhausted ({capacity} slots)")]
    ArenaExhausted {
        /// Configured slot count of the arena.
        capacity: usize,
    },

    /// The executor is already tracking its maximum number of tasks.
    #[error("executor task queue full ({capacity} tasks)")]
    QueueFull {
        /// Configured task capacity of the executor.
        capacity: usize,
    },

    /// A search worker thread panicked.
    #[error("worker thread panicked")]
    WorkerPanic,

    /// The executor has pending tasks but no queued wake and no
    /// registered I/O source that could produce one.
    #[error("executor stalled: {pending} pending tasks with no wake source")]
    Stalled {
        /// Tasks still pending when the stall was detected.
        pending: usize,
    },

    /// A future driven by [`Executor::block_on`](crate::Executor::block_on)
    /// reached its failure state.
    #[error("future failed: {0}")]
    Future(#[from] FutureError),

    /// An operating-system level failure from the reactor.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure codes surfaced by futures.
///
/// Combinators map an inner future's failure onto the code naming which
/// side failed; leaf futures fail with [`FutureError::LeafFailed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum FutureError {
    /// The first future of a `then` chain failed.
    #[error("then: first future failed")]
    ThenFut1Failed,
    /// The second future of a `then` chain failed.
    #[error("then: second future failed")]
    ThenFut2Failed,
    /// The first future of a `join` failed.
    #[error("join: first future failed")]
    JoinFut1Failed,
    /// The second future of a `join` failed.
    #[error("join: second future failed")]
    JoinFut2Failed,
    /// Both futures of a `join` failed.
    #[error("join: both futures failed")]
    JoinBothFailed,
    /// Both futures of a `select` failed.
    #[error("select: both futures failed")]
    SelectBothFailed,
    /// A leaf future reached its failure state.
    #[error("leaf future failed")]
    LeafFailed,
}
