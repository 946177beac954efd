//! Shared test helpers for component integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use parkmyst_components::builtin_registry;
use parkmyst_core::event::Event;
use parkmyst_core::identity::Sender;
use parkmyst_core::instance::{InstanceId, LifecycleState};
use parkmyst_runtime::{Game, GameConfig, GameGraph, InstanceSpec};
use parkmyst_test_support::{FixedClock, RecordingNotifier};
use serde_json::Value;

/// Build a game from `components` with every built-in kind registered and a
/// recording notifier standing in for the transport.
pub fn build_game(components: Vec<InstanceSpec>) -> (Game, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let registry = builtin_registry().unwrap();
    let game = Game::new(
        &registry,
        &GameGraph::new(components),
        notifier.clone(),
        FixedClock::shared(),
        GameConfig::default(),
    )
    .unwrap();
    (game, notifier)
}

/// Same as [`build_game`], already started.
pub fn start_game(components: Vec<InstanceSpec>) -> (Game, Arc<RecordingNotifier>) {
    let (mut game, notifier) = build_game(components);
    game.start();
    (game, notifier)
}

/// Shorthand for an instance spec.
pub fn node(id: i64, kind: &str, config: Value) -> InstanceSpec {
    InstanceSpec::new(id, kind, config)
}

pub fn id(raw: i64) -> InstanceId {
    InstanceId::new(raw)
}

pub fn lifecycle(game: &Game, raw: i64) -> LifecycleState {
    game.lifecycle(id(raw)).unwrap()
}

/// Publish `payload` on `topic` as `sender`.
pub fn send(game: &mut Game, topic: &str, sender: Sender, payload: Value) {
    game.publish(Event::new(topic, sender, payload));
}
