//! Feeds and the collaborator traits that carry and render them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::identity::PermissionTier;
use crate::instance::InstanceId;

/// Identifier of a live feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedId(Uuid);

impl FeedId {
    /// Allocates a fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A withdrawable, permission-scoped content channel owned by an instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    /// Feed identifier.
    pub id: FeedId,
    /// Instance that created the feed.
    pub owner: InstanceId,
    /// Output template name, interpreted by the render collaborator.
    pub kind: String,
    /// Current template data.
    pub payload: Value,
    /// Lowest tier allowed to see the feed.
    pub tier: PermissionTier,
    /// When the feed was created.
    pub created_at: DateTime<Utc>,
    /// When the payload was last replaced.
    pub updated_at: DateTime<Utc>,
}

impl Feed {
    /// Returns `true` if a participant of `tier` may see this feed.
    #[must_use]
    pub fn is_visible_to(&self, tier: PermissionTier) -> bool {
        tier.satisfies(self.tier)
    }
}

/// Outbound half of the transport collaborator.
///
/// Receives every feed change so it can push it to eligible participants.
/// Implementations must not call back into the publisher.
pub trait FeedNotifier: Send + Sync {
    /// A feed was created.
    fn feed_created(&self, feed: &Feed);

    /// A feed's payload was replaced.
    fn feed_updated(&self, feed: &Feed);

    /// A feed was withdrawn.
    fn feed_removed(&self, feed: &Feed);
}

/// Notifier that discards every change.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl FeedNotifier for NullNotifier {
    fn feed_created(&self, _feed: &Feed) {}

    fn feed_updated(&self, _feed: &Feed) {}

    fn feed_removed(&self, _feed: &Feed) {}
}

/// Render collaborator: turns a feed into participant-facing content.
pub trait Render {
    /// The rendered content type (HTML, a widget tree, ...).
    type Output;

    /// Renders `payload` with the template named `kind` for a participant of
    /// `tier`.
    fn render(&self, kind: &str, payload: &Value, tier: PermissionTier) -> Self::Output;
}
