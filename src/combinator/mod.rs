//! Future combinators: `then`, `join`, `select`.
//!
//! Each combinator is itself a future whose `progress` delegates to its
//! inner futures, owned by value. Completion and failure propagate per
//! the tables in the submodule docs; every failure code names which
//! side failed.

pub mod join;
pub mod select;
pub mod then;

pub use join::{join, Join};
pub use select::{select, Select, Selected};
pub use then::{then, Then};
