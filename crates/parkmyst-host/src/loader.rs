//! Game graph files.

use std::path::Path;

use parkmyst_runtime::GameGraph;
use tracing::info;

use crate::error::HostError;

/// Document syntax of a graph file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    /// `.json` and anything unrecognised.
    Json,
    /// `.yaml` / `.yml`.
    Yaml,
}

impl GraphFormat {
    /// Picks the format from the file extension.
    #[must_use]
    pub fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Parses a graph document.
///
/// # Errors
///
/// Returns `HostError::Json` or `HostError::Yaml` for a malformed document.
pub fn parse_graph(document: &str, format: GraphFormat) -> Result<GameGraph, HostError> {
    let graph = match format {
        GraphFormat::Json => serde_json::from_str(document)?,
        GraphFormat::Yaml => serde_yaml::from_str(document)?,
    };
    Ok(graph)
}

/// Reads and parses the graph file at `path`.
///
/// # Errors
///
/// Returns `HostError::Io` if the file cannot be read, otherwise see
/// [`parse_graph`].
pub async fn load_graph(path: &Path) -> Result<GameGraph, HostError> {
    let document = tokio::fs::read_to_string(path).await?;
    let graph = parse_graph(&document, GraphFormat::of(path))?;
    info!(
        path = %path.display(),
        components = graph.components.len(),
        "game graph read"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_follows_extension() {
        assert_eq!(GraphFormat::of(Path::new("tour.yaml")), GraphFormat::Yaml);
        assert_eq!(GraphFormat::of(Path::new("tour.YML")), GraphFormat::Yaml);
        assert_eq!(GraphFormat::of(Path::new("tour.json")), GraphFormat::Json);
        assert_eq!(GraphFormat::of(Path::new("tour")), GraphFormat::Json);
    }

    #[test]
    fn test_parse_graph_reports_syntax_errors_by_format() {
        let json = parse_graph("{ not json", GraphFormat::Json);
        let yaml = parse_graph("components: [ {", GraphFormat::Yaml);

        assert!(matches!(json, Err(HostError::Json(_))));
        assert!(matches!(yaml, Err(HostError::Yaml(_))));
    }

    #[test]
    fn test_parse_graph_reads_yaml() {
        let graph = parse_graph(
            "components:\n  - id: 1\n    kind: StartNode\n    next: [2]\n",
            GraphFormat::Yaml,
        )
        .unwrap();

        assert_eq!(graph.components.len(), 1);
        assert_eq!(graph.components[0].kind, "StartNode");
    }

    #[tokio::test]
    async fn test_load_graph_of_missing_file_is_io_error() {
        let result = load_graph(Path::new("/definitely/not/here.json")).await;

        assert!(matches!(result, Err(HostError::Io(_))));
    }
}
