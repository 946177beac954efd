//! Game graph documents.

use parkmyst_core::error::GameError;
use parkmyst_core::instance::InstanceId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One placed component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceSpec {
    /// Id used by other instances to address this one.
    pub id: InstanceId,
    /// Registered component kind.
    pub kind: String,
    /// Kind-specific configuration.
    #[serde(default)]
    pub config: Value,
    /// Successors started on completion.
    #[serde(default)]
    pub next: Vec<InstanceId>,
}

impl InstanceSpec {
    /// Creates an instance entry with no successors.
    pub fn new(id: i64, kind: impl Into<String>, config: Value) -> Self {
        Self {
            id: InstanceId::new(id),
            kind: kind.into(),
            config,
            next: Vec::new(),
        }
    }

    /// Sets the successors.
    #[must_use]
    pub fn with_next(mut self, next: &[i64]) -> Self {
        self.next = next.iter().copied().map(InstanceId::new).collect();
        self
    }
}

/// A whole game: every placed component and how they connect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameGraph {
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Placed components.
    pub components: Vec<InstanceSpec>,
}

impl GameGraph {
    /// Creates a graph from its components.
    #[must_use]
    pub fn new(components: Vec<InstanceSpec>) -> Self {
        Self {
            name: None,
            components,
        }
    }

    /// Parses a JSON graph document.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidGraph` if the document is malformed.
    pub fn from_json(document: &str) -> Result<Self, GameError> {
        serde_json::from_str(document).map_err(|e| GameError::InvalidGraph(e.to_string()))
    }

    /// Parses a YAML graph document.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidGraph` if the document is malformed.
    pub fn from_yaml(document: &str) -> Result<Self, GameError> {
        serde_yaml::from_str(document).map_err(|e| GameError::InvalidGraph(e.to_string()))
    }
}
