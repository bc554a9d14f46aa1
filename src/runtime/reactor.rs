//! The reactor: I/O readiness mapped to wake-ups.
//!
//! The reactor owns an OS readiness facility (epoll on Linux, via the
//! `polling` crate) and a registry from file descriptors to wakers. A
//! descriptor maps to at most one waker at a time; re-registering
//! replaces the association and re-arms the source.
//!
//! Sources are armed in oneshot mode: after a readiness event is
//! delivered for a descriptor its registration stays in the registry
//! but is disarmed until the owning future registers again. That makes
//! each waker good for at most one readiness event, which is exactly
//! the discipline the executor's single-enqueue invariant relies on.
//!
//! [`Reactor::poll`] is the runtime's only blocking call.

use std::collections::HashMap;
use std::io;
use std::os::unix::io::RawFd;

use polling::{Event, Poller};

use crate::runtime::waker::Waker;

/// Readiness interest flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interest(u8);

impl Interest {
    /// Interest in readable events.
    pub const READABLE: Interest = Interest(0b01);
    /// Interest in writable events.
    pub const WRITABLE: Interest = Interest(0b10);

    /// Interest in both readable and writable events.
    #[must_use]
    pub const fn both() -> Self {
        Interest(0b11)
    }

    /// Returns true if readable interest is set.
    #[must_use]
    pub const fn is_readable(self) -> bool {
        self.0 & Self::READABLE.0 != 0
    }

    /// Returns true if writable interest is set.
    #[must_use]
    pub const fn is_writable(self) -> bool {
        self.0 & Self::WRITABLE.0 != 0
    }
}

#[derive(Debug)]
struct Registration {
    waker: Waker,
    interest: Interest,
}

/// Event multiplexer for the executor.
pub struct Reactor {
    poller: Poller,
    registrations: HashMap<RawFd, Registration>,
    events: Vec<Event>,
}

impl Reactor {
    /// Creates a reactor around a fresh OS readiness descriptor.
    pub fn new() -> io::Result<Self> {
        Self::with_capacity(64)
    }

    /// Creates a reactor with a given event-buffer capacity.
    pub fn with_capacity(event_capacity: usize) -> io::Result<Self> {
        Ok(Self {
            poller: Poller::new()?,
            registrations: HashMap::new(),
            events: Vec::with_capacity(event_capacity.max(1)),
        })
    }

    /// Associates `fd` with a waker for the given interest.
    ///
    /// Replaces any prior association for `fd` and (re-)arms the
    /// source.
    pub fn register(&mut self, fd: RawFd, interest: Interest, waker: Waker) -> io::Result<()> {
        let event = to_event(fd, interest);
        if self.registrations.contains_key(&fd) {
            self.poller.modify(fd, event)?;
        } else {
            self.poller.add(fd, event)?;
        }
        tracing::trace!(fd, task = ?waker.task(), "register");
        self.registrations.insert(fd, Registration { waker, interest });
        Ok(())
    }

    /// Drops the association for `fd`.
    pub fn unregister(&mut self, fd: RawFd) -> io::Result<()> {
        match self.registrations.remove(&fd) {
            Some(_) => {
                tracing::trace!(fd, "unregister");
                self.poller.delete(fd)
            }
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                "fd not registered",
            )),
        }
    }

    /// Blocks until at least one registered descriptor is ready, then
    /// wakes the futures behind the ready descriptors.
    ///
    /// Returns the number of wakes delivered.
    pub fn poll(&mut self) -> io::Result<usize> {
        self.events.clear();
        self.poller.wait(&mut self.events, None)?;
        let mut delivered = 0;
        for event in &self.events {
            let fd = event.key as RawFd;
            if let Some(registration) = self.registrations.get(&fd) {
                registration.waker.wake();
                delivered += 1;
            }
        }
        tracing::trace!(delivered, "poll returned");
        Ok(delivered)
    }

    /// Number of registered descriptors.
    #[must_use]
    pub fn registration_count(&self) -> usize {
        self.registrations.len()
    }

    /// Returns true if no descriptor is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Currently registered interest for `fd`, if any.
    #[must_use]
    pub fn interest(&self, fd: RawFd) -> Option<Interest> {
        self.registrations.get(&fd).map(|r| r.interest)
    }
}

impl std::fmt::Debug for Reactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reactor")
            .field("registration_count", &self.registrations.len())
            .finish_non_exhaustive()
    }
}

fn to_event(fd: RawFd, interest: Interest) -> Event {
    let key = fd as usize;
    match (interest.is_readable(), interest.is_writable()) {
        (true, true) => Event::all(key),
        (true, false) => Event::readable(key),
        (false, true) => Event::writable(key),
        (false, false) => Event::none(key),
    }
}
