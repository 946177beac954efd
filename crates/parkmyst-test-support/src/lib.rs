//! Shared test doubles and utilities for the Parkmyst orchestration core.

mod clock;
mod identity;
mod notifier;

pub use clock::{FixedClock, fixed_now};
pub use identity::{admin, controller, user};
pub use notifier::{FeedChange, RecordingNotifier};
