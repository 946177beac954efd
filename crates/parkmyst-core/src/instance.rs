//! Instance identifiers and lifecycle states.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a placed component instance.
///
/// Graph documents use integers; any negative value is the "none" sentinel
/// that marks an open branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(i64);

impl InstanceId {
    /// The reserved "no target" id.
    pub const NONE: Self = Self(-1);

    /// Wraps a raw id.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns `true` for the "none" sentinel.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 < 0
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for InstanceId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Lifecycle state of an instance.
///
/// ```text
/// Idle ──start──► Active ──complete──► Completed ──clean-up──► Idle
///   ▲                                                    (or Terminal if one-shot)
///   └──────────── reset (from any non-terminal state) ───────────┘
/// end: any state ──► Terminal
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// Waiting to be started.
    Idle,
    /// Started; receives events.
    Active,
    /// Completed with clean-up suppressed; content stays visible.
    Completed,
    /// Ended; receives nothing and ignores further transitions.
    Terminal,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Terminal => "terminal",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_ids_are_none() {
        assert!(InstanceId::NONE.is_none());
        assert!(InstanceId::new(-42).is_none());
        assert!(!InstanceId::new(0).is_none());
    }

    #[test]
    fn test_instance_id_deserializes_from_integer() {
        let ids: Vec<InstanceId> = serde_json::from_str("[1, -1, 30]").unwrap();
        assert_eq!(ids, vec![InstanceId::new(1), InstanceId::NONE, InstanceId::new(30)]);
    }
}
