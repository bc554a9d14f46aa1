//! Generational task identifiers and the task table.
//!
//! Wakers survive their tasks: a readiness event can arrive after the
//! future it belongs to has completed. Identifying tasks with a
//! generation-stamped slot index makes such stale wakes harmless: the
//! lookup fails instead of touching an unrelated task that happens to
//! reuse the slot.

use core::fmt;

/// Identifier of a task owned by an executor.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId {
    index: u32,
    generation: u32,
}

impl fmt::Debug for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskId({}:{})", self.index, self.generation)
    }
}

#[derive(Debug)]
enum Slot<T> {
    Occupied { value: T, generation: u32 },
    Vacant { next_free: Option<u32>, generation: u32 },
}

/// Slab of task slots with generation counters.
#[derive(Debug)]
pub(crate) struct TaskTable<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<u32>,
    len: usize,
}

impl<T> TaskTable<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Stores a value, reusing a vacant slot when one exists.
    pub(crate) fn insert(&mut self, value: T) -> TaskId {
        self.len += 1;
        if let Some(index) = self.free_head {
            let slot = &mut self.slots[index as usize];
            let Slot::Vacant {
                next_free,
                generation,
            } = slot
            else {
                unreachable!("free list pointed to an occupied slot");
            };
            let generation = *generation;
            self.free_head = *next_free;
            *slot = Slot::Occupied { value, generation };
            TaskId { index, generation }
        } else {
            let index = u32::try_from(self.slots.len()).expect("task table overflow");
            self.slots.push(Slot::Occupied {
                value,
                generation: 0,
            });
            TaskId {
                index,
                generation: 0,
            }
        }
    }

    /// Removes and returns the value, if `id` is still current.
    pub(crate) fn remove(&mut self, id: TaskId) -> Option<T> {
        let slot = self.slots.get_mut(id.index as usize)?;
        match slot {
            Slot::Occupied { generation, .. } if *generation == id.generation => {
                let next_generation = generation.wrapping_add(1);
                let old = std::mem::replace(
                    slot,
                    Slot::Vacant {
                        next_free: self.free_head,
                        generation: next_generation,
                    },
                );
                self.free_head = Some(id.index);
                self.len -= 1;
                match old {
                    Slot::Occupied { value, .. } => Some(value),
                    Slot::Vacant { .. } => unreachable!(),
                }
            }
            _ => None,
        }
    }

    /// Mutable access to a live slot.
    pub(crate) fn get_mut(&mut self, id: TaskId) -> Option<&mut T> {
        match self.slots.get_mut(id.index as usize)? {
            Slot::Occupied { value, generation } if *generation == id.generation => Some(value),
            _ => None,
        }
    }
}
