//! Test notifier — records every feed change pushed to the transport.

use std::sync::Mutex;

use parkmyst_core::feed::{Feed, FeedId, FeedNotifier};
use parkmyst_core::identity::PermissionTier;
use parkmyst_core::instance::InstanceId;

/// One recorded notification.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedChange {
    /// `feed_created` was called.
    Created(Feed),
    /// `feed_updated` was called.
    Updated(Feed),
    /// `feed_removed` was called.
    Removed(Feed),
}

impl FeedChange {
    /// The feed carried by the notification.
    #[must_use]
    pub fn feed(&self) -> &Feed {
        match self {
            Self::Created(feed) | Self::Updated(feed) | Self::Removed(feed) => feed,
        }
    }
}

/// A notifier that records all changes in call order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    changes: Mutex<Vec<FeedChange>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every recorded change.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn changes(&self) -> Vec<FeedChange> {
        self.changes.lock().unwrap().clone()
    }

    /// Feeds that were created and not yet removed, in creation order.
    pub fn live_feeds(&self) -> Vec<Feed> {
        let mut live: Vec<Feed> = Vec::new();
        for change in self.changes() {
            match change {
                FeedChange::Created(feed) => live.push(feed),
                FeedChange::Updated(feed) => {
                    if let Some(slot) = live.iter_mut().find(|f| f.id == feed.id) {
                        *slot = feed;
                    }
                }
                FeedChange::Removed(feed) => live.retain(|f| f.id != feed.id),
            }
        }
        live
    }

    /// Live feeds a participant of `tier` would receive.
    pub fn delivered_to(&self, tier: PermissionTier) -> Vec<Feed> {
        self.live_feeds()
            .into_iter()
            .filter(|feed| feed.is_visible_to(tier))
            .collect()
    }

    /// Number of removal notifications for `id`.
    pub fn removals_of(&self, id: FeedId) -> usize {
        self.changes()
            .iter()
            .filter(|change| matches!(change, FeedChange::Removed(feed) if feed.id == id))
            .count()
    }

    /// Ids of all feeds ever created by `owner`.
    pub fn created_by(&self, owner: InstanceId) -> Vec<FeedId> {
        self.changes()
            .iter()
            .filter_map(|change| match change {
                FeedChange::Created(feed) if feed.owner == owner => Some(feed.id),
                _ => None,
            })
            .collect()
    }
}

impl FeedNotifier for RecordingNotifier {
    fn feed_created(&self, feed: &Feed) {
        self.changes
            .lock()
            .unwrap()
            .push(FeedChange::Created(feed.clone()));
    }

    fn feed_updated(&self, feed: &Feed) {
        self.changes
            .lock()
            .unwrap()
            .push(FeedChange::Updated(feed.clone()));
    }

    fn feed_removed(&self, feed: &Feed) {
        self.changes
            .lock()
            .unwrap()
            .push(FeedChange::Removed(feed.clone()));
    }
}
