//! Events exchanged over the bus.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identity::Sender;
use crate::instance::InstanceId;

/// Topic names understood by the runtime itself.
pub mod topics {
    /// Starts the instance named by the `target` payload field.
    pub const COMPONENT_START: &str = "componentStart";
    /// Resets the instance named by the `target` payload field.
    pub const COMPONENT_RESET: &str = "componentReset";
    /// Ends the instance named by the `target` payload field.
    pub const COMPONENT_END: &str = "componentEnd";
    /// Ends every instance of the game.
    pub const GAME_END: &str = "gameEnd";
    /// A participant scanned a QR code; payload `{ "code": string }`.
    pub const QR_CODE: &str = "qrCode";
    /// A participant's position changed.
    pub const LOCATION_UPDATED: &str = "locationUpdated";

    /// Returns `true` for topics that drive lifecycle transitions.
    #[must_use]
    pub fn is_lifecycle(topic: &str) -> bool {
        matches!(
            topic,
            COMPONENT_START | COMPONENT_RESET | COMPONENT_END | GAME_END
        )
    }
}

/// Name of an event channel.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// Creates a topic from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the topic name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Topic {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl From<String> for Topic {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for Topic {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// An ephemeral message published on a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Channel the event is published on.
    pub topic: Topic,
    /// Who emitted the event.
    pub sender: Sender,
    /// Free-form payload; shape is checked by subscriber guards.
    #[serde(default)]
    pub payload: Value,
}

impl Event {
    /// Creates an event.
    pub fn new(topic: impl Into<Topic>, sender: Sender, payload: Value) -> Self {
        Self {
            topic: topic.into(),
            sender,
            payload,
        }
    }

    /// Creates an event sent by the system.
    pub fn system(topic: impl Into<Topic>, payload: Value) -> Self {
        Self::new(topic, Sender::System, payload)
    }

    /// Builds a lifecycle event addressed at `target`.
    pub fn lifecycle(topic: &str, target: InstanceId) -> Self {
        Self::system(topic, serde_json::json!({ "target": target }))
    }

    /// Reads the `target` field of a lifecycle payload.
    ///
    /// Returns `None` when the field is missing or not an integer.
    #[must_use]
    pub fn target(&self) -> Option<InstanceId> {
        self.payload
            .get("target")
            .and_then(Value::as_i64)
            .map(InstanceId::new)
    }

    /// Reads a string field of the payload.
    #[must_use]
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.payload.get(field).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_event_round_trips_target() {
        let event = Event::lifecycle(topics::COMPONENT_RESET, InstanceId::new(12));

        assert_eq!(event.topic.as_str(), "componentReset");
        assert_eq!(event.sender, Sender::System);
        assert_eq!(event.target(), Some(InstanceId::new(12)));
    }

    #[test]
    fn test_target_is_none_for_malformed_payload() {
        let event = Event::system(topics::COMPONENT_END, serde_json::json!({ "target": "x" }));
        assert_eq!(event.target(), None);
    }

    #[test]
    fn test_is_lifecycle() {
        assert!(topics::is_lifecycle("componentStart"));
        assert!(topics::is_lifecycle("gameEnd"));
        assert!(!topics::is_lifecycle("simpleAnswer"));
    }

    #[test]
    fn test_event_deserializes_without_payload() {
        let json = serde_json::json!({ "topic": "stationCompleted", "sender": { "type": "system" } });

        let event: Event = serde_json::from_value(json).unwrap();

        assert_eq!(event.topic, Topic::from("stationCompleted"));
        assert!(event.payload.is_null());
    }
}
