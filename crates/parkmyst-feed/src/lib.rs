//! Parkmyst — feed publisher.
//!
//! Keeps the live feeds of a game and forwards every change to the transport
//! through [`FeedNotifier`](parkmyst_core::feed::FeedNotifier).

pub mod publisher;

pub use publisher::FeedPublisher;
