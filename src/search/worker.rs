//! The per-worker search loop.
//!
//! Each worker owns a private frame stack and sumset arena plus a local
//! best; the only shared state it touches is the [`Handoff`]. A worker
//! alternates between two modes:
//!
//! 1. Wait at the hand-off for a task (or the quiescence signal).
//! 2. Drain the task's subtree: pop frames, apply the branch rule, and
//!    occasionally donate the shallowest unexpanded frame to a waiting
//!    sibling.
//!
//! # Branch rule
//!
//! For an `Expand` frame `(a, b)`, canonicalised so `a.sum <= b.sum`:
//!
//! - If the achievable sums of `a` and `b` share only 0, the frame is
//!   rewritten to `Finalize` and one child `(a ∪ {i}, b)` is pushed for
//!   every `i` above `a.last` that is not an achievable sum of `b`.
//! - Otherwise the branch is dead. It is a solution exactly when both
//!   sums are equal and the shared sums are exactly `{0, total}`; it is
//!   recorded if it beats the local best. Either way the frame's
//!   reclaim handle goes back to the arena.
//!
//! Children sit above the rewritten `Finalize` frame, so pops process
//! the whole subtree before the parent's handle is released.
//!
//! # Donation
//!
//! Donation copies the chosen frame's sumset values into the hand-off
//! slot and rewrites the frame to `Finalize` in place: the recipient
//! explores the subtree, the donor still releases the handle it owns.
//! A subtree is worth donating only if it is deep enough to amortise
//! the synchronisation, hence the `d / 2` depth threshold.

use crate::error::Error;
use crate::search::arena::SumsetArena;
use crate::search::frame::{Frame, Phase, Reclaim};
use crate::search::handoff::{Handoff, Task};
use crate::search::solution::Solution;

/// A search worker bound to one hand-off.
pub(crate) struct Worker<'pool> {
    d: u32,
    donation_threshold: usize,
    handoff: &'pool Handoff,
    arena: SumsetArena,
    stack: Vec<Frame>,
    donation_floor: usize,
    best: Solution,
}

impl<'pool> Worker<'pool> {
    pub(crate) fn new(d: u32, arena_capacity: usize, handoff: &'pool Handoff) -> Self {
        Self {
            d,
            donation_threshold: (d / 2) as usize,
            handoff,
            arena: SumsetArena::with_capacity(arena_capacity),
            stack: Vec::new(),
            donation_floor: 0,
            best: Solution::default(),
        }
    }

    /// Runs until the pool quiesces or this worker hits an error.
    ///
    /// Both exits run the hand-off's termination bookkeeping exactly
    /// once, so a failing worker can never wedge the rest of the pool.
    pub(crate) fn run(mut self) -> Result<(), Error> {
        loop {
            let Some(task) = self.handoff.next_task(&self.best) else {
                return Ok(());
            };
            if let Err(error) = self.run_task(task) {
                tracing::warn!(%error, "worker aborting");
                self.handoff.retire(&self.best);
                return Err(error);
            }
        }
    }

    /// Explores one donated subtree to exhaustion.
    fn run_task(&mut self, (seed_a, seed_b): Task) -> Result<(), Error> {
        let a = self.arena.alloc(seed_a)?;
        let b = match self.arena.alloc(seed_b) {
            Ok(handle) => handle,
            Err(error) => {
                self.arena.release(a);
                return Err(error);
            }
        };
        self.stack.push(Frame {
            a,
            b,
            phase: Phase::Expand,
            reclaim: Reclaim::None,
        });
        self.donation_floor = 0;

        let result = self.drain();
        if result.is_ok() {
            self.arena.release(a);
            self.arena.release(b);
            debug_assert!(self.stack.is_empty());
            debug_assert!(self.arena.is_empty(), "arena slot leak");
        } else {
            self.stack.clear();
        }
        result
    }

    fn drain(&mut self) -> Result<(), Error> {
        loop {
            // The floor can sit above the top after a donation; the
            // saturation keeps the depth at zero until the stack grows
            // past it again.
            if self.stack.len().saturating_sub(self.donation_floor) > self.donation_threshold
                && self.handoff.wants_task()
            {
                self.donate();
            }
            let Some(frame) = self.stack.pop() else {
                return Ok(());
            };
            match frame.phase {
                Phase::Finalize => self.release_reclaim(frame),
                Phase::Expand => self.expand(frame)?,
            }
        }
    }

    /// Applies the branch rule to one unexpanded frame.
    fn expand(&mut self, frame: Frame) -> Result<(), Error> {
        let (mut ha, mut hb, mut reclaim) = (frame.a, frame.b, frame.reclaim);
        if self.arena.get(ha).sum() > self.arena.get(hb).sum() {
            std::mem::swap(&mut ha, &mut hb);
            reclaim = reclaim.swapped();
        }
        let a = *self.arena.get(ha);
        let b = *self.arena.get(hb);

        if a.intersection_is_trivial(&b) {
            self.stack.push(Frame {
                a: ha,
                b: hb,
                phase: Phase::Finalize,
                reclaim,
            });
            for i in (a.last() + 1)..=self.d {
                if !b.contains_sum(i) {
                    let child = self.arena.alloc(a.extend(i))?;
                    self.stack.push(Frame {
                        a: child,
                        b: hb,
                        phase: Phase::Expand,
                        reclaim: Reclaim::A,
                    });
                }
            }
        } else {
            if a.sum() == b.sum() && b.sum() > self.best.sum() && a.intersection_size(&b) == 2 {
                self.best = Solution::record(&a, &b);
                tracing::trace!(sum = a.sum(), "new local best");
            }
            self.release_reclaim(Frame {
                a: ha,
                b: hb,
                phase: frame.phase,
                reclaim,
            });
        }
        Ok(())
    }

    fn release_reclaim(&mut self, frame: Frame) {
        match frame.reclaim {
            Reclaim::None => {}
            Reclaim::A => self.arena.release(frame.a),
            Reclaim::B => self.arena.release(frame.b),
        }
    }

    /// Publishes the shallowest unexpanded frame above the floor.
    ///
    /// The top frame is excluded: handing it over would leave this
    /// worker with nothing but finalizers on its current path.
    fn donate(&mut self) {
        let handoff = self.handoff;
        let stack = &mut self.stack;
        let arena = &self.arena;
        let floor = &mut self.donation_floor;
        let donated = handoff.offer(|| {
            let top = stack.len() - 1;
            let index = (*floor..top).find(|&i| stack[i].phase == Phase::Expand)?;
            let frame = &mut stack[index];
            let task = (*arena.get(frame.a), *arena.get(frame.b));
            frame.phase = Phase::Finalize;
            *floor = index + 1;
            Some(task)
        });
        if donated {
            tracing::trace!("donated a subtree");
        }
    }
}
