//! Parkmyst — event bus.
//!
//! Tracks which instance listens on which topic and turns a published event
//! into one [`Delivery`] per subscriber. The bus never runs handlers itself:
//! deliveries are handed to the scheduler, which runs them one instance at a
//! time and applies each subscriber's guard.
//!
//! ```text
//!   publish(event) ──► snapshot(topic) ──► [Delivery{sub1}, Delivery{sub2}, ...]
//!                                                   │
//!                                  scheduler queue ◄┘
//! ```

pub mod bus;

pub use bus::{Delivery, EventBus};
