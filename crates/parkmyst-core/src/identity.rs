//! Participant identity and permission tiers.

use serde::{Deserialize, Serialize};

/// Ordered participant privilege level.
///
/// Gates feed visibility and event authorization. `User < Controller < Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionTier {
    /// An ordinary participant.
    #[default]
    User,
    /// A station or game controller.
    Controller,
    /// A game administrator.
    Admin,
}

impl PermissionTier {
    /// Returns `true` if a participant of this tier may see content gated at
    /// `required`.
    #[must_use]
    pub fn satisfies(self, required: Self) -> bool {
        self >= required
    }
}

/// A player as supplied by the identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Stable player identifier.
    pub id: String,
    /// Display name.
    pub username: String,
    /// Avatar shown next to player-generated content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    /// Privilege level of the player.
    #[serde(default)]
    pub tier: PermissionTier,
}

impl Player {
    /// Creates a player with no profile picture.
    pub fn new(id: impl Into<String>, username: impl Into<String>, tier: PermissionTier) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            profile_picture_url: None,
            tier,
        }
    }
}

/// Originator of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Sender {
    /// The runtime itself, or a component acting on its behalf.
    System,
    /// A connected participant.
    Player(Player),
}

impl Sender {
    /// Returns the player behind this sender, if any.
    #[must_use]
    pub fn player(&self) -> Option<&Player> {
        match self {
            Self::System => None,
            Self::Player(player) => Some(player),
        }
    }

    /// Returns `true` for the system sender and for players at or above
    /// `Controller`.
    ///
    /// This is the usual guard for events that ordinary participants must not
    /// be able to forge.
    #[must_use]
    pub fn is_privileged(&self) -> bool {
        match self {
            Self::System => true,
            Self::Player(player) => player.tier.satisfies(PermissionTier::Controller),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_are_ordered_ascending() {
        assert!(PermissionTier::User < PermissionTier::Controller);
        assert!(PermissionTier::Controller < PermissionTier::Admin);
    }

    #[test]
    fn test_satisfies_accepts_equal_and_higher_tiers() {
        assert!(PermissionTier::Admin.satisfies(PermissionTier::Controller));
        assert!(PermissionTier::Controller.satisfies(PermissionTier::Controller));
        assert!(!PermissionTier::User.satisfies(PermissionTier::Controller));
    }

    #[test]
    fn test_is_privileged() {
        let user = Sender::Player(Player::new("p1", "alice", PermissionTier::User));
        let controller = Sender::Player(Player::new("p2", "bob", PermissionTier::Controller));

        assert!(Sender::System.is_privileged());
        assert!(controller.is_privileged());
        assert!(!user.is_privileged());
    }

    #[test]
    fn test_sender_deserializes_from_tagged_json() {
        let json = serde_json::json!({
            "type": "player",
            "id": "p1",
            "username": "alice",
            "tier": "controller"
        });

        let sender: Sender = serde_json::from_value(json).unwrap();

        let player = sender.player().unwrap();
        assert_eq!(player.username, "alice");
        assert_eq!(player.tier, PermissionTier::Controller);
    }
}
