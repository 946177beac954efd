//! Parkmyst Core — shared abstractions.
//!
//! Identifiers, participant identity, events, feeds and the error type that
//! every other crate of the orchestration core depends on. It contains no
//! scheduling or storage code.

pub mod clock;
pub mod error;
pub mod event;
pub mod feed;
pub mod identity;
pub mod instance;
