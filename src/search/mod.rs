//! Parallel branch-and-bound search for equal-sum sumset pairs.
//!
//! Given `d`, the search looks for two disjoint-by-sums subsets of
//! `{1..d}` whose sums are equal and maximal: the achievable subset
//! sums of the pair may coincide only at 0 and at the common total.
//!
//! The implementation is iterative and parallel:
//!
//! - [`Sumset`] caches an element mask and an achievable-sum mask so
//!   the branch predicates are a handful of word operations.
//! - Each worker explores frames from a private stack, with sumsets
//!   parked in a private [`arena`](SumsetArena) addressed by handles.
//! - Workers share work through a single hand-off slot; an idle worker
//!   waits there until a busy one donates the shallowest unexpanded
//!   frame of its stack.
//! - Termination is quiescence detection: the pool is done when every
//!   worker is waiting at an empty slot.

mod arena;
mod frame;
mod handoff;
mod input;
mod solution;
mod solver;
mod sumset;
mod worker;

pub use arena::{Handle, SumsetArena};
pub use frame::{Frame, Phase, Reclaim};
pub use input::InputData;
pub use solution::Solution;
pub use solver::{Incomplete, Solver};
pub use sumset::{Sumset, MAX_ELEMENT, MAX_SUM};
