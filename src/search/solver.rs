//! The parallel solver: a fixed worker pool around one hand-off.

use thiserror::Error;

use crate::config::SolverConfig;
use crate::error::Error;
use crate::search::handoff::Handoff;
use crate::search::solution::Solution;
use crate::search::sumset::{Sumset, MAX_ELEMENT};
use crate::search::worker::Worker;

/// A solve that stopped early, carrying whatever was found first.
#[derive(Debug, Error)]
#[error("search aborted: {error}")]
pub struct Incomplete {
    /// The failure that stopped the search.
    #[source]
    pub error: Error,
    /// Best solution recorded before the failure.
    pub best_so_far: Solution,
}

/// Branch-and-bound solver for equal-sum sumset pairs over `{1..d}`.
#[derive(Debug, Clone)]
pub struct Solver {
    d: u32,
    threads: usize,
    config: SolverConfig,
}

impl Solver {
    /// Creates a solver for elements up to `d` using `threads` workers.
    ///
    /// `d` is clamped to [`MAX_ELEMENT`] and `threads` to at least 1.
    #[must_use]
    pub fn new(d: u32, threads: usize) -> Self {
        Self::with_config(d, threads, SolverConfig::from_env())
    }

    /// Creates a solver with explicit capacities.
    #[must_use]
    pub fn with_config(d: u32, threads: usize, config: SolverConfig) -> Self {
        Self {
            d: d.min(MAX_ELEMENT),
            threads: threads.max(1),
            config,
        }
    }

    /// Maximum element value considered by this solver.
    #[must_use]
    pub const fn d(&self) -> u32 {
        self.d
    }

    /// Worker thread count.
    #[must_use]
    pub const fn threads(&self) -> usize {
        self.threads
    }

    /// Finds the maximum-equal-sum pair extending the given seeds.
    ///
    /// Runs to exhaustion; the returned value is deterministic in its
    /// sum (though not in the particular pair) for any thread count.
    /// On failure the best solution found so far rides along in
    /// [`Incomplete`].
    pub fn solve(&self, seed_a: Sumset, seed_b: Sumset) -> Result<Solution, Incomplete> {
        let handoff = Handoff::new(self.threads, (seed_a, seed_b));
        tracing::debug!(d = self.d, threads = self.threads, "starting search");

        let results: Vec<Result<(), Error>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..self.threads)
                .map(|index| {
                    let handoff = &handoff;
                    let spawned = std::thread::Builder::new()
                        .name(format!("splitsum-worker-{index}"))
                        .spawn_scoped(scope, move || {
                            Worker::new(self.d, self.config.arena_capacity, handoff).run()
                        });
                    if spawned.is_err() {
                        // The pool is smaller than promised; retire the
                        // ghost so quiescence still adds up.
                        handoff.retire(&Solution::default());
                    }
                    spawned
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| match handle {
                    Ok(handle) => handle.join().unwrap_or(Err(Error::WorkerPanic)),
                    Err(error) => Err(Error::Io(error)),
                })
                .collect()
        });

        let best = handoff.into_best();
        match results.into_iter().find_map(Result::err) {
            None => Ok(best),
            Some(error) => Err(Incomplete {
                error,
                best_so_far: best,
            }),
        }
    }
}
