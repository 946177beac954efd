//! Feed publisher.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use parkmyst_core::clock::SharedClock;
use parkmyst_core::error::GameError;
use parkmyst_core::feed::{Feed, FeedId, FeedNotifier, Render};
use parkmyst_core::identity::PermissionTier;
use parkmyst_core::instance::InstanceId;
use serde_json::Value;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct Feeds {
    next_seq: u64,
    // Sequence number keeps listings in creation order.
    entries: HashMap<FeedId, (u64, Feed)>,
}

/// Creates, updates and withdraws feeds.
///
/// All mutations go through one lock and the notifier is called while it is
/// held, so the transport observes changes to a feed in the order they were
/// made.
pub struct FeedPublisher {
    feeds: Mutex<Feeds>,
    notifier: Arc<dyn FeedNotifier>,
    clock: SharedClock,
}

impl std::fmt::Debug for FeedPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedPublisher")
            .field("feeds", &self.len())
            .finish_non_exhaustive()
    }
}

impl FeedPublisher {
    /// Creates a publisher that reports to `notifier`.
    #[must_use]
    pub fn new(notifier: Arc<dyn FeedNotifier>, clock: SharedClock) -> Self {
        Self {
            feeds: Mutex::new(Feeds::default()),
            notifier,
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Feeds> {
        self.feeds.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates a feed owned by `owner` and distributes it.
    pub fn create(
        &self,
        owner: InstanceId,
        kind: impl Into<String>,
        payload: Value,
        tier: PermissionTier,
    ) -> FeedId {
        let now = self.clock.now();
        let feed = Feed {
            id: FeedId::generate(),
            owner,
            kind: kind.into(),
            payload,
            tier,
            created_at: now,
            updated_at: now,
        };
        let id = feed.id;

        let mut feeds = self.lock();
        feeds.next_seq += 1;
        let seq = feeds.next_seq;
        self.notifier.feed_created(&feed);
        info!(feed = %id, owner = %owner, kind = %feed.kind, tier = ?tier, "feed created");
        feeds.entries.insert(id, (seq, feed));
        id
    }

    /// Replaces the payload of `id` and redistributes it.
    ///
    /// # Errors
    ///
    /// Returns `GameError::UnknownFeed` if no such feed is live.
    pub fn update(&self, id: FeedId, payload: Value) -> Result<(), GameError> {
        let now = self.clock.now();
        let mut feeds = self.lock();
        let (_, feed) = feeds
            .entries
            .get_mut(&id)
            .ok_or(GameError::UnknownFeed(id))?;
        feed.payload = payload;
        feed.updated_at = now;
        self.notifier.feed_updated(feed);
        debug!(feed = %id, "feed updated");
        Ok(())
    }

    /// Withdraws `id`. Returns `false` if it was not live.
    pub fn remove(&self, id: FeedId) -> bool {
        let mut feeds = self.lock();
        match feeds.entries.remove(&id) {
            Some((_, feed)) => {
                self.notifier.feed_removed(&feed);
                info!(feed = %id, owner = %feed.owner, "feed removed");
                true
            }
            None => {
                debug!(feed = %id, "remove of absent feed ignored");
                false
            }
        }
    }

    /// Withdraws every feed owned by `owner`, each exactly once.
    pub fn remove_owned_by(&self, owner: InstanceId) -> Vec<FeedId> {
        let mut feeds = self.lock();
        let mut owned: Vec<(u64, FeedId)> = feeds
            .entries
            .iter()
            .filter(|(_, (_, feed))| feed.owner == owner)
            .map(|(id, (seq, _))| (*seq, *id))
            .collect();
        owned.sort_unstable_by_key(|(seq, _)| *seq);

        let mut removed = Vec::with_capacity(owned.len());
        for (_, id) in owned {
            if let Some((_, feed)) = feeds.entries.remove(&id) {
                self.notifier.feed_removed(&feed);
                removed.push(id);
            }
        }
        if !removed.is_empty() {
            info!(owner = %owner, count = removed.len(), "owned feeds removed");
        }
        removed
    }

    /// Returns a copy of feed `id`, if live.
    #[must_use]
    pub fn get(&self, id: FeedId) -> Option<Feed> {
        self.lock().entries.get(&id).map(|(_, feed)| feed.clone())
    }

    /// Ids of the live feeds owned by `owner`, in creation order.
    #[must_use]
    pub fn owned_by(&self, owner: InstanceId) -> Vec<FeedId> {
        self.sorted(|feed| feed.owner == owner)
            .into_iter()
            .map(|feed| feed.id)
            .collect()
    }

    /// Live feeds a participant of `tier` may see, in creation order.
    #[must_use]
    pub fn visible_to(&self, tier: PermissionTier) -> Vec<Feed> {
        self.sorted(|feed| feed.is_visible_to(tier))
    }

    /// Renders every feed visible to `tier`.
    pub fn render_for<R: Render>(&self, tier: PermissionTier, renderer: &R) -> Vec<(FeedId, R::Output)> {
        self.visible_to(tier)
            .into_iter()
            .map(|feed| (feed.id, renderer.render(&feed.kind, &feed.payload, tier)))
            .collect()
    }

    /// Number of live feeds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Returns `true` when no feed is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Withdraws every live feed.
    pub fn clear(&self) {
        let owners: Vec<InstanceId> = {
            let feeds = self.lock();
            let mut owners: Vec<InstanceId> =
                feeds.entries.values().map(|(_, feed)| feed.owner).collect();
            owners.sort_unstable();
            owners.dedup();
            owners
        };
        for owner in owners {
            self.remove_owned_by(owner);
        }
    }

    fn sorted(&self, keep: impl Fn(&Feed) -> bool) -> Vec<Feed> {
        let feeds = self.lock();
        let mut selected: Vec<&(u64, Feed)> =
            feeds.entries.values().filter(|(_, feed)| keep(feed)).collect();
        selected.sort_unstable_by_key(|(seq, _)| *seq);
        selected.into_iter().map(|(_, feed)| feed.clone()).collect()
    }
}
