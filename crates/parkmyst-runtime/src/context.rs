//! The handle a hook uses to reach the runtime.

use parkmyst_bus::EventBus;
use parkmyst_core::error::GameError;
use parkmyst_core::event::{Event, Topic};
use parkmyst_core::feed::FeedId;
use parkmyst_core::identity::PermissionTier;
use parkmyst_core::instance::InstanceId;
use parkmyst_feed::FeedPublisher;
use parkmyst_state::StateStore;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};

use crate::descriptor::Descriptor;

/// A transition or emission asked for by a hook.
///
/// Requests are queued and executed by the scheduling loop after the hook
/// returns, never inline.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Request {
    Start(InstanceId),
    Complete(InstanceId),
    Reset(InstanceId),
    End(InstanceId),
    Publish(Event),
    EndGame,
}

/// What a running hook can see and do.
pub struct Context<'a> {
    id: InstanceId,
    descriptor: &'a Descriptor,
    successors: &'a [InstanceId],
    state: &'a StateStore,
    feeds: &'a FeedPublisher,
    bus: &'a mut EventBus,
    requests: &'a mut Vec<Request>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        id: InstanceId,
        descriptor: &'a Descriptor,
        successors: &'a [InstanceId],
        state: &'a StateStore,
        feeds: &'a FeedPublisher,
        bus: &'a mut EventBus,
        requests: &'a mut Vec<Request>,
    ) -> Self {
        Self {
            id,
            descriptor,
            successors,
            state,
            feeds,
            bus,
            requests,
        }
    }

    /// Id of the running instance.
    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Kind name of the running instance.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.descriptor.kind
    }

    /// Declared successors of the running instance.
    #[must_use]
    pub fn successors(&self) -> &[InstanceId] {
        self.successors
    }

    // --- state ---

    /// Reads this instance's state; absent state decodes to `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::State` if the stored value does not decode as `T`.
    pub fn state<T: DeserializeOwned + Default>(&self) -> Result<T, GameError> {
        self.state.instance_state(self.id)
    }

    /// Replaces this instance's state.
    ///
    /// # Errors
    ///
    /// Returns `GameError::State` if `value` cannot be serialized.
    pub fn set_state<T: Serialize>(&self, value: &T) -> Result<(), GameError> {
        self.state.set_instance_state(self.id, value)
    }

    /// Atomic read-modify-write of this instance's state.
    ///
    /// # Errors
    ///
    /// Returns `GameError::State` if the stored value does not decode as `T`.
    pub fn update_state<T, R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, GameError>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        self.state.update_instance_state(self.id, f)
    }

    /// Reads the shared state under `key`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::State` if the stored value does not decode as `T`.
    pub fn shared<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, GameError> {
        self.state.shared_state(key)
    }

    /// Replaces the shared state under `key`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::State` if `value` cannot be serialized.
    pub fn set_shared<T: Serialize>(&self, key: &str, value: &T) -> Result<(), GameError> {
        self.state.set_shared_state(key, value)
    }

    /// Atomic read-modify-write of the shared state under `key`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::State` if the stored value does not decode as `T`.
    pub fn update_shared<T, R>(&self, key: &str, f: impl FnOnce(&mut T) -> R) -> Result<R, GameError>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        self.state.update_shared_state(key, f)
    }

    // --- subscriptions ---

    /// Subscribes this instance to `topic`. Idempotent.
    pub fn subscribe(&mut self, topic: impl Into<Topic>) -> bool {
        self.bus.subscribe(self.id, topic)
    }

    /// Unsubscribes this instance from `topic`. Idempotent.
    pub fn unsubscribe(&mut self, topic: &str) -> bool {
        self.bus.unsubscribe(self.id, topic)
    }

    // --- feeds ---

    /// Creates a feed owned by this instance.
    ///
    /// The tier is the one declared for `kind` by the descriptor, or the
    /// broadest tier when the kind is not declared.
    pub fn create_feed(&self, kind: &str, payload: Value) -> FeedId {
        let tier = self
            .descriptor
            .feed_tier(kind)
            .unwrap_or(PermissionTier::User);
        self.feeds.create(self.id, kind, payload, tier)
    }

    /// Creates a feed owned by this instance at an explicit tier.
    pub fn create_feed_for(&self, kind: &str, payload: Value, tier: PermissionTier) -> FeedId {
        self.feeds.create(self.id, kind, payload, tier)
    }

    /// Replaces the payload of feed `id`.
    ///
    /// An absent feed was already withdrawn; that is logged and reported as
    /// `false`.
    pub fn update_feed(&self, id: FeedId, payload: Value) -> bool {
        match self.feeds.update(id, payload) {
            Ok(()) => true,
            Err(err) => {
                debug!(instance = %self.id, error = %err, "feed update skipped");
                false
            }
        }
    }

    /// Withdraws feed `id`. Idempotent.
    pub fn remove_feed(&self, id: FeedId) -> bool {
        self.feeds.remove(id)
    }

    /// Live feeds owned by this instance, in creation order.
    #[must_use]
    pub fn owned_feeds(&self) -> Vec<FeedId> {
        self.feeds.owned_by(self.id)
    }

    // --- transitions ---

    /// Completes this instance once the hook returns.
    pub fn complete(&mut self) {
        self.requests.push(Request::Complete(self.id));
    }

    /// Sends a start signal to `target`. The none sentinel is ignored.
    pub fn start(&mut self, target: InstanceId) {
        if self.skip_none("start", target) {
            return;
        }
        self.requests.push(Request::Start(target));
    }

    /// Sends a start signal to every declared successor.
    pub fn start_successors(&mut self) {
        for &target in self.successors {
            if !target.is_none() {
                self.requests.push(Request::Start(target));
            }
        }
    }

    /// Resets `target`, which need not be a successor.
    pub fn reset(&mut self, target: InstanceId) {
        if self.skip_none("reset", target) {
            return;
        }
        self.requests.push(Request::Reset(target));
    }

    /// Ends `target` for good.
    pub fn end(&mut self, target: InstanceId) {
        if self.skip_none("end", target) {
            return;
        }
        self.requests.push(Request::End(target));
    }

    /// Publishes a system event on `topic` once the hook returns.
    pub fn emit(&mut self, topic: impl Into<Topic>, payload: Value) {
        self.requests.push(Request::Publish(Event::system(topic, payload)));
    }

    /// Ends every instance of the game.
    pub fn end_game(&mut self) {
        self.requests.push(Request::EndGame);
    }

    fn skip_none(&self, action: &str, target: InstanceId) -> bool {
        if target.is_none() {
            trace!(instance = %self.id, action, "open branch, nothing to signal");
            return true;
        }
        false
    }
}
