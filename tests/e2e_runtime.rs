//! End-to-end tests for the executor and reactor.

use std::cell::Cell;
use std::io::{Read, Write};
use std::os::unix::io::AsRawFd;
use std::os::unix::net::UnixStream;
use std::rc::Rc;

use splitsum::combinator::then;
use splitsum::config::ExecutorConfig;
use splitsum::runtime::futures::{apply, from_fn, ready, Readable};
use splitsum::{Error, Executor, Step};

#[test]
fn spawned_futures_run_exactly_once_when_immediately_ready() {
    let mut executor = Executor::new().unwrap();
    let polls = Rc::new(Cell::new(0));
    for _ in 0..4 {
        let polls = Rc::clone(&polls);
        executor
            .spawn(from_fn(move |_reactor, _waker| {
                polls.set(polls.get() + 1);
                Step::Completed(())
            }))
            .unwrap();
    }
    executor.run().unwrap();
    assert_eq!(polls.get(), 4);
}

#[test]
fn a_future_that_is_never_spawned_is_never_progressed() {
    let mut executor = Executor::new().unwrap();
    let polls = Rc::new(Cell::new(0));
    let orphan_polls = Rc::clone(&polls);
    let _orphan = from_fn(move |_reactor, _waker| {
        orphan_polls.set(orphan_polls.get() + 1);
        Step::Completed(())
    });

    executor.spawn(ready(())).unwrap();
    executor.run().unwrap();
    assert_eq!(polls.get(), 0);
}

#[test]
fn spawn_fails_once_the_task_table_is_full() {
    let config = ExecutorConfig {
        max_tasks: 2,
        event_capacity: 8,
    };
    let mut executor = Executor::with_config(config).unwrap();
    executor.spawn(ready(())).unwrap();
    executor.spawn(ready(())).unwrap();
    let err = executor.spawn(ready(())).unwrap_err();
    assert!(matches!(err, Error::QueueFull { capacity: 2 }));

    // Draining frees the capacity again.
    executor.run().unwrap();
    executor.spawn(ready(())).unwrap();
    executor.run().unwrap();
}

#[test]
fn reactor_wake_reschedules_a_parked_future() {
    let (sock, peer) = UnixStream::pair().unwrap();
    let fd = sock.as_raw_fd();
    let mut executor = Executor::new().unwrap();

    let observed = Rc::new(Cell::new(false));
    let seen = Rc::clone(&observed);
    executor
        .spawn(then(Readable::new(fd), apply(move |()| seen.set(true))))
        .unwrap();

    // The writer runs on the same executor; the reader's readiness
    // arrives only through the reactor.
    executor
        .spawn(from_fn(move |_reactor, _waker| {
            (&peer).write_all(b"ping").unwrap();
            Step::Completed(())
        }))
        .unwrap();

    executor.run().unwrap();
    assert!(observed.get());

    let mut buffer = [0u8; 4];
    (&sock).read_exact(&mut buffer).unwrap();
    assert_eq!(&buffer, b"ping");
}

#[test]
fn block_on_drives_io_futures() {
    let (sock, peer) = UnixStream::pair().unwrap();
    (&peer).write_all(b"x").unwrap();

    let mut executor = Executor::new().unwrap();
    executor.block_on(Readable::new(sock.as_raw_fd())).unwrap();
    assert!(executor.reactor_mut().is_empty(), "registration released");
}

#[test]
fn registrations_do_not_outlive_their_futures() {
    let (sock, peer) = UnixStream::pair().unwrap();
    let fd = sock.as_raw_fd();
    let mut executor = Executor::new().unwrap();

    executor.spawn(Readable::new(fd)).unwrap();
    executor
        .spawn(from_fn(move |_reactor, _waker| {
            (&peer).write_all(b"!").unwrap();
            Step::Completed(())
        }))
        .unwrap();
    executor.run().unwrap();

    assert_eq!(executor.reactor_mut().registration_count(), 0);
}
