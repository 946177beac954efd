//! Integration tests for questions.

mod common;

use common::{id, lifecycle, node, send, start_game};
use parkmyst_core::identity::{PermissionTier, Player, Sender};
use parkmyst_core::instance::LifecycleState;
use parkmyst_test_support::{FeedChange, user};
use serde_json::{Value, json};

fn question_graph(kind: &str) -> Vec<parkmyst_runtime::InstanceSpec> {
    vec![
        node(1, "StartNode", Value::Null).with_next(&[2]),
        node(
            2,
            kind,
            json!({
                "question": "Capital of Hungary?",
                "answer": "budapest",
                "matchPercentage": 0.75,
                "onFail": 3
            }),
        )
        .with_next(&[4]),
        node(3, "HtmlMessage", json!({ "message": "Try again" })),
        node(4, "HtmlMessage", json!({ "message": "Well done" })),
    ]
}

#[test]
fn test_close_enough_answer_passes() {
    let (mut game, notifier) = start_game(question_graph("SimpleQuestion"));

    send(&mut game, "simpleAnswer", user("ann"), json!({ "answer": "budapset" }));

    assert_eq!(lifecycle(&game, 2), LifecycleState::Idle);
    assert_eq!(lifecycle(&game, 4), LifecycleState::Active);
    assert!(notifier.created_by(id(3)).is_empty());
}

#[test]
fn test_wrong_answer_starts_on_fail_and_keeps_waiting() {
    let (mut game, _) = start_game(question_graph("SimpleQuestion"));

    send(&mut game, "simpleAnswer", user("ann"), json!({ "answer": "vienna" }));

    assert_eq!(lifecycle(&game, 2), LifecycleState::Active);
    assert_eq!(lifecycle(&game, 3), LifecycleState::Active);
    assert_eq!(lifecycle(&game, 4), LifecycleState::Idle);
}

#[test]
fn test_malformed_answer_is_rejected_by_guard() {
    let (mut game, _) = start_game(question_graph("SimpleQuestion"));

    send(&mut game, "simpleAnswer", user("ann"), json!({ "answer": 42 }));

    assert_eq!(game.stats().rejected_by_guard, 1);
    assert_eq!(lifecycle(&game, 2), LifecycleState::Active);
}

#[test]
fn test_comment_question_lists_wrong_answers() {
    // Arrange
    let (mut game, notifier) = start_game(question_graph("CommentQuestion"));
    let mut player = Player::new("p-1", "ann", PermissionTier::User);
    player.profile_picture_url = Some("http://pics/ann.png".to_owned());

    // Act
    send(&mut game, "simpleAnswer", Sender::Player(player), json!({ "answer": "vienna" }));

    // Assert
    let updated: Vec<_> = notifier
        .changes()
        .into_iter()
        .filter_map(|change| match change {
            FeedChange::Updated(feed) => Some(feed),
            _ => None,
        })
        .collect();
    assert_eq!(updated.len(), 1);
    assert_eq!(
        updated[0].payload["comments"],
        json!([{ "username": "ann", "profilePictureUrl": "http://pics/ann.png", "answer": "vienna" }])
    );
}
