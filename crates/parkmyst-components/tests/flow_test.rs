//! Integration tests for flow nodes and lifecycle routing.

mod common;

use common::{id, lifecycle, node, start_game};
use parkmyst_core::instance::LifecycleState;
use serde_json::{Value, json};

#[test]
fn test_start_node_runs_through_to_end_node() {
    // Arrange / Act
    let (game, _) = start_game(vec![
        node(1, "StartNode", Value::Null).with_next(&[2]),
        node(2, "EndNode", Value::Null),
    ]);

    // Assert
    assert!(game.is_ended());
    assert_eq!(lifecycle(&game, 1), LifecycleState::Terminal);
    assert_eq!(lifecycle(&game, 2), LifecycleState::Terminal);
}

#[test]
fn test_dangling_successor_completes_and_starts_nothing() {
    let (game, _) = start_game(vec![
        node(1, "StartNode", Value::Null).with_next(&[42]),
        node(2, "Station", Value::Null),
    ]);

    assert_eq!(lifecycle(&game, 1), LifecycleState::Idle);
    assert_eq!(lifecycle(&game, 2), LifecycleState::Idle);
    assert_eq!(game.stats().handler_failures, 0);
    assert_eq!(game.stats().ignored_targets, 1);
}

#[test]
fn test_resetter_restarts_a_non_successor_and_withdraws_its_feeds_once() {
    // Arrange
    let (mut game, notifier) = start_game(vec![
        node(1, "StartNode", Value::Null).with_next(&[2]),
        node(2, "Station", Value::Null),
        node(3, "Resetter", json!({ "toReset": 2 })),
    ]);
    let old_feeds = game.feeds().owned_by(id(2));
    assert_eq!(old_feeds.len(), 2);

    // Act
    game.start_instance(id(3));

    // Assert
    for feed in &old_feeds {
        assert_eq!(notifier.removals_of(*feed), 1);
    }
    assert_eq!(lifecycle(&game, 2), LifecycleState::Active);
    let new_feeds = game.feeds().owned_by(id(2));
    assert_eq!(new_feeds.len(), 2);
    assert!(new_feeds.iter().all(|feed| !old_feeds.contains(feed)));
    assert_eq!(lifecycle(&game, 3), LifecycleState::Idle);
}

#[test]
fn test_finisher_ends_its_target_for_good() {
    let (mut game, _) = start_game(vec![
        node(1, "StartNode", Value::Null).with_next(&[2]),
        node(2, "Station", Value::Null),
        node(3, "Finisher", json!({ "toFinish": 2 })),
    ]);

    game.start_instance(id(3));
    game.reset(id(2));

    assert_eq!(lifecycle(&game, 2), LifecycleState::Terminal);
    assert!(game.feeds().owned_by(id(2)).is_empty());
    assert!(game.subscriptions_of(id(2)).is_empty());
}

#[test]
fn test_open_branch_ports_are_tolerated() {
    let (mut game, _) = start_game(vec![
        node(1, "Finisher", json!({ "toFinish": -1 })),
        node(2, "Resetter", json!({ "toReset": 99 })),
    ]);

    game.start_instance(id(1));
    game.start_instance(id(2));

    assert_eq!(lifecycle(&game, 1), LifecycleState::Idle);
    assert_eq!(lifecycle(&game, 2), LifecycleState::Idle);
    assert_eq!(game.stats().handler_failures, 0);
}
