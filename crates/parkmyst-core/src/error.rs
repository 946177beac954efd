//! Error types for the orchestration core.

use thiserror::Error;

use crate::feed::FeedId;
use crate::instance::InstanceId;

/// Top-level error type shared by every crate of the core.
#[derive(Debug, Error)]
pub enum GameError {
    /// A component kind was registered twice.
    #[error("component kind already registered: {0}")]
    DuplicateKind(String),

    /// A component kind is not registered.
    #[error("unknown component kind: {0}")]
    UnknownKind(String),

    /// No instance exists under this id.
    #[error("unknown instance: {0}")]
    UnknownInstance(InstanceId),

    /// Two instances of one graph share an id.
    #[error("instance id used twice in game graph: {0}")]
    DuplicateInstance(InstanceId),

    /// No feed exists under this id.
    #[error("unknown feed: {0}")]
    UnknownFeed(FeedId),

    /// An instance configuration does not match the shape of its kind.
    #[error("invalid configuration for instance {instance} of kind {kind}: {reason}")]
    InvalidConfiguration {
        /// The instance being created.
        instance: InstanceId,
        /// The kind it was declared with.
        kind: String,
        /// What was wrong with the configuration.
        reason: String,
    },

    /// A game graph document could not be parsed.
    #[error("invalid game graph: {0}")]
    InvalidGraph(String),

    /// A component hook returned an error.
    #[error("handler of instance {instance} failed: {reason}")]
    HandlerFailure {
        /// The instance whose hook failed.
        instance: InstanceId,
        /// Failure description.
        reason: String,
    },

    /// Stored state could not be converted to or from the requested type.
    #[error("state error: {0}")]
    State(String),

    /// The game runner is no longer accepting commands.
    #[error("game runtime closed")]
    RuntimeClosed,
}

impl GameError {
    /// Builds a [`GameError::HandlerFailure`] for `instance`.
    pub fn handler(instance: InstanceId, reason: impl Into<String>) -> Self {
        Self::HandlerFailure {
            instance,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        Self::State(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_failure_message_names_instance() {
        let err = GameError::handler(InstanceId::new(7), "boom");
        assert_eq!(err.to_string(), "handler of instance 7 failed: boom");
    }

    #[test]
    fn test_serde_error_maps_to_state_error() {
        let parse: Result<u32, _> = serde_json::from_str("\"nope\"");
        let err: GameError = parse.unwrap_err().into();
        assert!(matches!(err, GameError::State(_)));
    }
}
