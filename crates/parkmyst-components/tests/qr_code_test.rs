//! Integration tests for QR code checkpoints and lifecycle topics.

mod common;

use common::{id, lifecycle, node, send, start_game};
use parkmyst_core::event::{Event, topics};
use parkmyst_core::instance::LifecycleState;
use parkmyst_test_support::{admin, user};
use serde_json::{Value, json};

fn qr_graph() -> Vec<parkmyst_runtime::InstanceSpec> {
    vec![
        node(1, "StartNode", Value::Null).with_next(&[2]),
        node(2, "QrCode", json!({ "code": "fountain", "nextComponent": 3 })).with_next(&[4]),
        node(3, "Station", Value::Null),
        node(4, "ImageMessage", json!({ "url": "http://pics/map.png", "alt": "map" })),
    ]
}

#[test]
fn test_matching_scan_starts_only_next_component() {
    let (mut game, _) = start_game(qr_graph());

    send(&mut game, topics::QR_CODE, user("ann"), json!({ "code": "fountain" }));

    assert_eq!(lifecycle(&game, 2), LifecycleState::Idle);
    assert_eq!(lifecycle(&game, 3), LifecycleState::Active);
    assert_eq!(lifecycle(&game, 4), LifecycleState::Idle);
    assert!(game.feeds().owned_by(id(4)).is_empty());
}

#[test]
fn test_other_codes_are_ignored() {
    let (mut game, _) = start_game(qr_graph());

    send(&mut game, topics::QR_CODE, user("ann"), json!({ "code": "statue" }));

    assert_eq!(lifecycle(&game, 2), LifecycleState::Active);
    assert_eq!(game.stats().deliveries, 1);
}

#[test]
fn test_admin_can_reset_through_lifecycle_topic() {
    // Arrange
    let (mut game, notifier) = start_game(qr_graph());
    send(&mut game, topics::QR_CODE, user("ann"), json!({ "code": "fountain" }));
    let station_feeds = game.feeds().owned_by(id(3));

    // Act
    let mut reset = Event::lifecycle(topics::COMPONENT_RESET, id(3));
    reset.sender = admin("root");
    game.publish(reset);

    // Assert
    assert_eq!(station_feeds.len(), 2);
    for feed in station_feeds {
        assert_eq!(notifier.removals_of(feed), 1);
    }
    assert_eq!(lifecycle(&game, 3), LifecycleState::Active);
    assert_eq!(game.feeds().owned_by(id(3)).len(), 2);
}

#[test]
fn test_user_cannot_end_the_game() {
    let (mut game, _) = start_game(qr_graph());

    send(&mut game, topics::GAME_END, user("ann"), Value::Null);

    assert!(!game.is_ended());
    assert_eq!(game.stats().unauthorized, 1);
}
