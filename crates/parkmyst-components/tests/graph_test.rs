//! Integration tests for loading game graph documents.

mod common;

use std::sync::Arc;

use parkmyst_components::builtin_registry;
use parkmyst_core::error::GameError;
use parkmyst_core::event::Event;
use parkmyst_core::instance::LifecycleState;
use parkmyst_runtime::{Game, GameConfig, GameGraph, GameRunner};
use parkmyst_test_support::{FixedClock, RecordingNotifier, controller};
use serde_json::Value;

const TOUR: &str = "
name: old town
components:
  - id: 1
    kind: StartNode
    next: [2]
  - id: 2
    kind: HtmlMessage
    config:
      message: Welcome to the old town
    next: [3]
  - id: 3
    kind: Station
    next: [4]
  - id: 4
    kind: EndNode
";

fn load(graph: &GameGraph) -> Result<Game, GameError> {
    Game::new(
        &builtin_registry()?,
        graph,
        Arc::new(RecordingNotifier::new()),
        FixedClock::shared(),
        GameConfig::default(),
    )
}

#[test]
fn test_yaml_tour_loads_and_starts() {
    let graph = GameGraph::from_yaml(TOUR).unwrap();
    let mut game = load(&graph).unwrap();

    game.start();

    assert_eq!(game.name(), Some("old town"));
    assert_eq!(common::lifecycle(&game, 2), LifecycleState::Active);
    assert_eq!(common::lifecycle(&game, 3), LifecycleState::Active);
}

#[test]
fn test_missing_required_field_fails_fast() {
    let graph = GameGraph::from_json(
        r#"{ "components": [ { "id": 1, "kind": "HtmlMessage", "config": {} } ] }"#,
    )
    .unwrap();

    let result = load(&graph);

    assert!(matches!(result, Err(GameError::InvalidConfiguration { .. })));
}

#[test]
fn test_unknown_config_field_fails_fast() {
    let graph = GameGraph::from_json(
        r#"{ "components": [ { "id": 1, "kind": "QrCode", "config": { "code": "x", "colour": "red" } } ] }"#,
    )
    .unwrap();

    let result = load(&graph);

    assert!(matches!(result, Err(GameError::InvalidConfiguration { .. })));
}

#[tokio::test]
async fn test_tour_runs_to_the_end_through_the_runner() {
    // Arrange
    let graph = GameGraph::from_yaml(TOUR).unwrap();
    let (task, handle) = GameRunner::spawn(load(&graph).unwrap());

    // Act
    handle
        .publish(Event::new("stationCompleted", controller("guide"), Value::Null))
        .await
        .unwrap();
    let station = handle.lifecycle(common::id(3)).await.unwrap();
    handle.shutdown().await.unwrap();
    let game = task.await.unwrap();

    // Assert
    assert_eq!(station, Some(LifecycleState::Terminal));
    assert!(game.is_ended());
    assert!(game.feeds().is_empty());
}

#[test]
fn test_misspelled_question_field_fails_fast() {
    let graph = GameGraph::from_json(
        r#"{ "components": [ { "id": 1, "kind": "CommentQuestion", "config": {
            "question": "Who built the bridge?", "answer": "Clark",
            "matchPercentage": 0.8, "matchPercent": 0.8, "onFail": -1 } } ] }"#,
    )
    .unwrap();

    let result = load(&graph);

    assert!(matches!(result, Err(GameError::InvalidConfiguration { .. })));
}
