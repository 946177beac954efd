//! Parkmyst host — error types.

use parkmyst_core::error::GameError;
use thiserror::Error;

/// Startup and runtime errors of the host process.
#[derive(Debug, Error)]
pub enum HostError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Reading the graph file or the transport failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON document or line could not be parsed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML document could not be parsed.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The game rejected the graph or stopped.
    #[error(transparent)]
    Game(#[from] GameError),
}
