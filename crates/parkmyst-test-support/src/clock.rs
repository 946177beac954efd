//! Test clock — deterministic `Clock` implementation for tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use parkmyst_core::clock::{Clock, SharedClock};

/// A clock that always returns a fixed point in time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Returns a shared clock pinned at [`fixed_now`].
    #[must_use]
    pub fn shared() -> SharedClock {
        Arc::new(Self(fixed_now()))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Timestamp used across tests.
///
/// # Panics
///
/// Never; the date is a valid constant.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}
