//! Parkmyst — state store.
//!
//! Holds the opaque state of every instance plus the shared state namespace
//! that instances use for aggregation (point totals and the like). Every
//! entry has its own lock, so a read-modify-write on one key never
//! interleaves with another on the same key while disjoint keys proceed
//! independently.

mod slots;
pub mod store;

pub use store::StateStore;
