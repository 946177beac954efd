//! Integration tests for the point system.

mod common;

use common::{id, lifecycle, node, send, start_game};
use parkmyst_components::point::{POINTS_KEY, PointTable};
use parkmyst_core::instance::LifecycleState;
use parkmyst_test_support::{controller, user};
use serde_json::{Value, json};

fn points(game: &parkmyst_runtime::Game, counter: &str) -> i64 {
    let table: PointTable = game.state().shared_state(POINTS_KEY).unwrap();
    table[counter].point
}

#[test]
fn test_changers_update_the_counter_and_result_shows_it() {
    // Arrange / Act
    let (game, notifier) = start_game(vec![
        node(1, "PointInitializer", json!({ "id": "team" })),
        node(2, "StartNode", Value::Null).with_next(&[3]),
        node(3, "PointChanger", json!({ "counterId": "team", "operation": "add", "amount": 5 }))
            .with_next(&[4]),
        node(4, "PointChanger", json!({ "counterId": "team", "operation": "remove", "amount": 3 }))
            .with_next(&[5]),
        node(5, "PointResult", json!({ "counterId": "team" })),
    ]);

    // Assert
    assert_eq!(points(&game, "team"), 2);
    assert_eq!(lifecycle(&game, 5), LifecycleState::Completed);
    let result = notifier.created_by(id(5));
    assert_eq!(result.len(), 1);
    assert_eq!(game.feeds().get(result[0]).unwrap().payload, json!({ "points": 2 }));
}

#[test]
fn test_empty_counter_id_reaches_every_counter() {
    let (mut game, _) = start_game(vec![
        node(1, "PointInitializer", json!({ "id": "red" })),
        node(2, "PointInitializer", json!({ "id": "blue" })),
    ]);

    send(
        &mut game,
        "pointEvent",
        controller("ref"),
        json!({ "counterId": "", "operation": "add", "amount": 4 }),
    );

    assert_eq!(points(&game, "red"), 4);
    assert_eq!(points(&game, "blue"), 4);
}

#[test]
fn test_users_cannot_award_themselves_points() {
    let (mut game, _) = start_game(vec![node(1, "PointInitializer", json!({ "id": "team" }))]);

    send(
        &mut game,
        "pointEvent",
        user("ann"),
        json!({ "counterId": "team", "operation": "add", "amount": 100 }),
    );

    assert_eq!(points(&game, "team"), 0);
    assert_eq!(game.stats().rejected_by_guard, 1);
}

#[test]
fn test_result_for_unknown_counter_shows_minus_one() {
    let (mut game, notifier) = start_game(vec![node(1, "PointResult", json!({ "counterId": "ghost" }))]);

    game.start_instance(id(1));

    let feed = notifier.created_by(id(1))[0];
    assert_eq!(game.feeds().get(feed).unwrap().payload, json!({ "points": -1 }));
}

#[test]
fn test_counter_saturates_instead_of_overflowing() {
    // Arrange
    let (mut game, _) = start_game(vec![node(1, "PointInitializer", json!({ "id": "team" }))]);
    send(
        &mut game,
        "pointEvent",
        controller("ref"),
        json!({ "counterId": "team", "operation": "add", "amount": i64::MAX }),
    );

    // Act
    send(
        &mut game,
        "pointEvent",
        controller("ref"),
        json!({ "counterId": "team", "operation": "add", "amount": 1 }),
    );

    // Assert
    assert_eq!(points(&game, "team"), i64::MAX);
    assert_eq!(game.stats().deliveries, 2);
    assert_eq!(game.stats().handler_failures, 0);
}
