//! Sender builders for event tests.

use parkmyst_core::identity::{PermissionTier, Player, Sender};

/// A plain participant sender.
#[must_use]
pub fn user(username: &str) -> Sender {
    Sender::Player(Player::new(format!("id-{username}"), username, PermissionTier::User))
}

/// A controller sender.
#[must_use]
pub fn controller(username: &str) -> Sender {
    Sender::Player(Player::new(
        format!("id-{username}"),
        username,
        PermissionTier::Controller,
    ))
}

/// An admin sender.
#[must_use]
pub fn admin(username: &str) -> Sender {
    Sender::Player(Player::new(format!("id-{username}"), username, PermissionTier::Admin))
}
