//! Subscription table and dispatch snapshots.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parkmyst_core::event::{Event, Topic};
use parkmyst_core::instance::InstanceId;
use tracing::{debug, trace};

/// One event addressed to one subscriber.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// The instance that should handle the event.
    pub subscriber: InstanceId,
    /// The event, shared between all deliveries of one publish.
    pub event: Arc<Event>,
}

/// Named-topic subscription table.
///
/// Subscribers of a topic are kept ordered by instance id, so one publish
/// always produces its deliveries in the same order.
#[derive(Debug, Default)]
pub struct EventBus {
    by_topic: HashMap<Topic, BTreeSet<InstanceId>>,
    by_instance: HashMap<InstanceId, BTreeSet<Topic>>,
    published: u64,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `instance` to `topic`.
    ///
    /// Returns `false` if it was already subscribed.
    pub fn subscribe(&mut self, instance: InstanceId, topic: impl Into<Topic>) -> bool {
        let topic = topic.into();
        let added = self
            .by_topic
            .entry(topic.clone())
            .or_default()
            .insert(instance);
        if added {
            debug!(instance = %instance, topic = %topic, "subscribed");
            self.by_instance.entry(instance).or_default().insert(topic);
        }
        added
    }

    /// Unsubscribes `instance` from `topic`.
    ///
    /// Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, instance: InstanceId, topic: &str) -> bool {
        let removed = match self.by_topic.get_mut(topic) {
            Some(subscribers) => {
                let removed = subscribers.remove(&instance);
                if subscribers.is_empty() {
                    self.by_topic.remove(topic);
                }
                removed
            }
            None => false,
        };
        if removed {
            debug!(instance = %instance, topic, "unsubscribed");
            if let Some(topics) = self.by_instance.get_mut(&instance) {
                topics.remove(topic);
                if topics.is_empty() {
                    self.by_instance.remove(&instance);
                }
            }
        }
        removed
    }

    /// Drops every subscription of `instance` and returns the topics it had.
    pub fn unsubscribe_all(&mut self, instance: InstanceId) -> Vec<Topic> {
        let Some(topics) = self.by_instance.remove(&instance) else {
            return Vec::new();
        };
        for topic in &topics {
            if let Some(subscribers) = self.by_topic.get_mut(topic) {
                subscribers.remove(&instance);
                if subscribers.is_empty() {
                    self.by_topic.remove(topic);
                }
            }
        }
        debug!(instance = %instance, count = topics.len(), "all subscriptions dropped");
        topics.into_iter().collect()
    }

    /// Returns `true` if `instance` listens on `topic`.
    #[must_use]
    pub fn is_subscribed(&self, instance: InstanceId, topic: &str) -> bool {
        self.by_topic
            .get(topic)
            .is_some_and(|subscribers| subscribers.contains(&instance))
    }

    /// Topics `instance` listens on, sorted.
    #[must_use]
    pub fn topics_of(&self, instance: InstanceId) -> Vec<Topic> {
        self.by_instance
            .get(&instance)
            .map(|topics| topics.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of instances listening on `topic`.
    #[must_use]
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.by_topic.get(topic).map_or(0, BTreeSet::len)
    }

    /// Total number of events published.
    #[must_use]
    pub fn published(&self) -> u64 {
        self.published
    }

    /// Snapshots the subscribers of the event's topic into deliveries.
    ///
    /// Subscriptions made after this call do not receive the event.
    pub fn publish(&mut self, event: Event) -> Vec<Delivery> {
        self.published += 1;
        let event = Arc::new(event);
        let deliveries: Vec<Delivery> = self
            .by_topic
            .get(event.topic.as_str())
            .map(|subscribers| {
                subscribers
                    .iter()
                    .map(|&subscriber| Delivery {
                        subscriber,
                        event: Arc::clone(&event),
                    })
                    .collect()
            })
            .unwrap_or_default();
        trace!(topic = %event.topic, receivers = deliveries.len(), "event published");
        deliveries
    }

    /// Drops every subscription.
    pub fn clear(&mut self) {
        self.by_topic.clear();
        self.by_instance.clear();
    }
}
