//! The lifecycle scheduler.
//!
//! A [`Game`] owns every instance of one game graph in an arena indexed by
//! id, together with a FIFO queue of pending work. Public entry points push
//! work and drain the queue; hooks only ever add more work through their
//! [`Context`], so long successor chains and cyclic reset graphs never
//! recurse.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use parkmyst_bus::{Delivery, EventBus};
use parkmyst_core::clock::SharedClock;
use parkmyst_core::error::GameError;
use parkmyst_core::event::{Event, Topic, topics};
use parkmyst_core::feed::FeedNotifier;
use parkmyst_core::identity::PermissionTier;
use parkmyst_core::instance::{InstanceId, LifecycleState};
use parkmyst_feed::FeedPublisher;
use parkmyst_state::StateStore;
use serde::Serialize;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::component::{Component, HookResult};
use crate::config::GameConfig;
use crate::context::{Context, Request};
use crate::descriptor::Descriptor;
use crate::graph::GameGraph;
use crate::registry::DescriptorRegistry;

/// Counters describing what a game has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GameStats {
    /// Events accepted for fan-out.
    pub events_published: u64,
    /// Events handed to a subscriber's `on_event`.
    pub deliveries: u64,
    /// Deliveries dropped by a subscriber's guard.
    pub rejected_by_guard: u64,
    /// Lifecycle events refused because the sender lacked the tier.
    pub unauthorized: u64,
    /// Hooks that returned an error.
    pub handler_failures: u64,
    /// Lifecycle state changes.
    pub transitions: u64,
    /// Signals addressed to the none sentinel or an absent instance.
    pub ignored_targets: u64,
    /// Work items dropped by the runaway guard.
    pub dropped_work: u64,
}

#[derive(Debug)]
struct Slot {
    descriptor: Descriptor,
    component: Box<dyn Component>,
    successors: Vec<InstanceId>,
    lifecycle: LifecycleState,
}

#[derive(Debug)]
enum Work {
    GameStart,
    Start(InstanceId),
    Complete(InstanceId),
    Reset(InstanceId),
    End(InstanceId),
    Publish(Event),
    Deliver(Delivery),
    EndGame,
}

impl From<Request> for Work {
    fn from(request: Request) -> Self {
        match request {
            Request::Start(id) => Self::Start(id),
            Request::Complete(id) => Self::Complete(id),
            Request::Reset(id) => Self::Reset(id),
            Request::End(id) => Self::End(id),
            Request::Publish(event) => Self::Publish(event),
            Request::EndGame => Self::EndGame,
        }
    }
}

#[derive(Clone, Copy)]
enum Hook<'e> {
    GameStart,
    Start,
    Event(&'e Event),
    Complete,
    CleanUp,
}

impl Hook<'_> {
    fn name(self) -> &'static str {
        match self {
            Self::GameStart => "on_game_start",
            Self::Start => "on_start",
            Self::Event(_) => "on_event",
            Self::Complete => "on_complete",
            Self::CleanUp => "on_clean_up",
        }
    }
}

/// One running game.
#[derive(Debug)]
pub struct Game {
    name: Option<String>,
    slots: BTreeMap<InstanceId, Slot>,
    state: Arc<StateStore>,
    feeds: Arc<FeedPublisher>,
    bus: EventBus,
    queue: VecDeque<Work>,
    config: GameConfig,
    stats: GameStats,
    started: bool,
    ended: bool,
}

impl Game {
    /// Instantiates every component of `graph`.
    ///
    /// Nothing runs until [`Game::start`].
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidGraph` for a negative instance id,
    /// `GameError::DuplicateInstance` for an id used twice, and the errors of
    /// [`DescriptorRegistry::instantiate`] for unknown kinds or bad
    /// configurations.
    pub fn new(
        registry: &DescriptorRegistry,
        graph: &GameGraph,
        notifier: Arc<dyn FeedNotifier>,
        clock: SharedClock,
        config: GameConfig,
    ) -> Result<Self, GameError> {
        let mut slots = BTreeMap::new();
        for spec in &graph.components {
            if spec.id.is_none() {
                return Err(GameError::InvalidGraph(format!(
                    "instance id {} is reserved",
                    spec.id
                )));
            }
            if slots.contains_key(&spec.id) {
                return Err(GameError::DuplicateInstance(spec.id));
            }
            let (descriptor, component) =
                registry.instantiate(spec.id, &spec.kind, spec.config.clone())?;
            slots.insert(
                spec.id,
                Slot {
                    descriptor,
                    component,
                    successors: spec.next.clone(),
                    lifecycle: LifecycleState::Idle,
                },
            );
        }
        info!(
            game = graph.name.as_deref().unwrap_or("unnamed"),
            instances = slots.len(),
            "game graph loaded"
        );

        Ok(Self {
            name: graph.name.clone(),
            slots,
            state: Arc::new(StateStore::new()),
            feeds: Arc::new(FeedPublisher::new(notifier, clock)),
            bus: EventBus::new(),
            queue: VecDeque::new(),
            config,
            stats: GameStats::default(),
            started: false,
            ended: false,
        })
    }

    // --- entry points ---

    /// Runs `on_game_start` everywhere, arms counting kinds and starts the
    /// auto-start instances. Calling it twice does nothing.
    #[instrument(skip(self), fields(game = self.name.as_deref().unwrap_or("unnamed")))]
    pub fn start(&mut self) {
        if self.started {
            warn!("game already started");
            return;
        }
        self.started = true;
        self.run(Work::GameStart);
    }

    /// Publishes an event and processes everything it causes.
    ///
    /// Lifecycle topics are turned into transitions when the sender may
    /// trigger them, and are fanned out to subscribers like any other topic.
    #[instrument(skip(self, event), fields(topic = %event.topic))]
    pub fn publish(&mut self, event: Event) {
        self.run(Work::Publish(event));
    }

    /// Sends a start signal to `id`.
    #[instrument(skip(self))]
    pub fn start_instance(&mut self, id: InstanceId) {
        self.run(Work::Start(id));
    }

    /// Resets `id`: clean-up, then start behavior again.
    #[instrument(skip(self))]
    pub fn reset(&mut self, id: InstanceId) {
        self.run(Work::Reset(id));
    }

    /// Ends `id` for good.
    #[instrument(skip(self))]
    pub fn end(&mut self, id: InstanceId) {
        self.run(Work::End(id));
    }

    /// Ends every instance.
    #[instrument(skip(self))]
    pub fn end_game(&mut self) {
        self.run(Work::EndGame);
    }

    // --- read-out ---

    /// Display name of the graph.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Lifecycle state of `id`, if it exists.
    #[must_use]
    pub fn lifecycle(&self, id: InstanceId) -> Option<LifecycleState> {
        self.slots.get(&id).map(|slot| slot.lifecycle)
    }

    /// Kind of `id`, if it exists.
    #[must_use]
    pub fn kind_of(&self, id: InstanceId) -> Option<&'static str> {
        self.slots.get(&id).map(|slot| slot.descriptor.kind)
    }

    /// Every instance id, ascending.
    #[must_use]
    pub fn instance_ids(&self) -> Vec<InstanceId> {
        self.slots.keys().copied().collect()
    }

    /// Topics `id` is subscribed to.
    #[must_use]
    pub fn subscriptions_of(&self, id: InstanceId) -> Vec<Topic> {
        self.bus.topics_of(id)
    }

    /// Counters so far.
    #[must_use]
    pub fn stats(&self) -> GameStats {
        self.stats
    }

    /// Returns `true` once [`Game::start`] ran.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Returns `true` once the game was ended.
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// The state store of this game.
    #[must_use]
    pub fn state(&self) -> &Arc<StateStore> {
        &self.state
    }

    /// The feed publisher of this game.
    #[must_use]
    pub fn feeds(&self) -> &Arc<FeedPublisher> {
        &self.feeds
    }

    /// Scheduler settings.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    // --- scheduling loop ---

    fn run(&mut self, work: Work) {
        self.queue.push_back(work);
        self.drain();
    }

    fn drain(&mut self) {
        let mut steps = 0;
        while let Some(work) = self.queue.pop_front() {
            if steps == self.config.max_steps_per_drain {
                let dropped = self.queue.len() + 1;
                self.stats.dropped_work += dropped as u64;
                self.queue.clear();
                error!(
                    limit = self.config.max_steps_per_drain,
                    dropped, "work did not settle, dropping the rest"
                );
                break;
            }
            steps += 1;
            self.step(work);
        }
    }

    fn step(&mut self, work: Work) {
        match work {
            Work::GameStart => self.game_start(),
            Work::Start(id) => self.start_signal(id),
            Work::Complete(id) => self.complete(id),
            Work::Reset(id) => self.reset_instance(id),
            Work::End(id) => self.end_instance(id),
            Work::Publish(event) => self.fan_out(event),
            Work::Deliver(delivery) => self.deliver(&delivery),
            Work::EndGame => self.end_all(),
        }
    }

    fn game_start(&mut self) {
        let ids = self.instance_ids();
        for &id in &ids {
            if self.armed(id) {
                self.set_lifecycle(id, LifecycleState::Active);
            }
            self.invoke(id, Hook::GameStart);
        }
        for id in ids {
            if self.slots.get(&id).is_some_and(|slot| slot.descriptor.flags.auto_start) {
                self.queue.push_back(Work::Start(id));
            }
        }
        info!(instances = self.slots.len(), "game started");
    }

    fn start_signal(&mut self, id: InstanceId) {
        let Some(slot) = self.slots.get(&id) else {
            self.ignore_target("start", id);
            return;
        };
        let lifecycle = slot.lifecycle;
        if !slot.descriptor.flags.default_start_enabled {
            if lifecycle == LifecycleState::Active {
                self.invoke(id, Hook::Start);
            } else {
                debug!(instance = %id, state = %lifecycle, "activation ignored");
            }
            return;
        }
        if lifecycle != LifecycleState::Idle {
            debug!(instance = %id, state = %lifecycle, "start ignored");
            return;
        }
        self.set_lifecycle(id, LifecycleState::Active);
        self.invoke(id, Hook::Start);
    }

    fn complete(&mut self, id: InstanceId) {
        let Some(slot) = self.slots.get(&id) else {
            self.ignore_target("complete", id);
            return;
        };
        if slot.lifecycle != LifecycleState::Active {
            debug!(instance = %id, state = %slot.lifecycle, "complete ignored");
            return;
        }
        let flags = slot.descriptor.flags;

        self.set_lifecycle(id, LifecycleState::Completed);
        let completed = self.invoke(id, Hook::Complete);

        if completed && flags.uses_successor_list {
            if let Some(slot) = self.slots.get(&id) {
                let starts = slot
                    .successors
                    .iter()
                    .filter(|target| !target.is_none())
                    .map(|&target| Work::Start(target));
                self.queue.extend(starts);
            }
        }
        if flags.clean_up_on_completion {
            self.clean_up(id);
            let next = if flags.one_shot {
                LifecycleState::Terminal
            } else {
                LifecycleState::Idle
            };
            self.set_lifecycle(id, next);
        }
    }

    fn reset_instance(&mut self, id: InstanceId) {
        let Some(slot) = self.slots.get(&id) else {
            self.ignore_target("reset", id);
            return;
        };
        if slot.lifecycle == LifecycleState::Terminal {
            debug!(instance = %id, "reset of ended instance ignored");
            return;
        }
        self.clean_up(id);
        self.set_lifecycle(id, LifecycleState::Idle);
        self.set_lifecycle(id, LifecycleState::Active);
        if self.armed(id) {
            self.invoke(id, Hook::GameStart);
        } else {
            self.invoke(id, Hook::Start);
        }
        info!(instance = %id, "instance reset");
    }

    fn end_instance(&mut self, id: InstanceId) {
        let Some(slot) = self.slots.get(&id) else {
            self.ignore_target("end", id);
            return;
        };
        if slot.lifecycle == LifecycleState::Terminal {
            return;
        }
        self.clean_up(id);
        self.set_lifecycle(id, LifecycleState::Terminal);
    }

    fn end_all(&mut self) {
        if self.ended {
            return;
        }
        for id in self.instance_ids() {
            self.end_instance(id);
        }
        self.ended = true;
        info!(game = self.name.as_deref().unwrap_or("unnamed"), "game ended");
    }

    fn fan_out(&mut self, event: Event) {
        let topic = event.topic.as_str();
        if topics::is_lifecycle(topic) {
            if event
                .sender
                .player()
                .is_some_and(|player| !player.tier.satisfies(PermissionTier::Controller))
            {
                self.stats.unauthorized += 1;
                warn!(topic, "lifecycle event from unprivileged player refused");
                return;
            }
            let work = if topic == topics::GAME_END {
                Some(Work::EndGame)
            } else {
                match event.target() {
                    Some(target) if target.is_none() => {
                        trace!(topic, "lifecycle event for an open branch, nothing to signal");
                        None
                    }
                    Some(target) if topic == topics::COMPONENT_START => Some(Work::Start(target)),
                    Some(target) if topic == topics::COMPONENT_RESET => Some(Work::Reset(target)),
                    Some(target) => Some(Work::End(target)),
                    None => {
                        warn!(topic, "lifecycle event without target ignored");
                        None
                    }
                }
            };
            self.queue.extend(work);
        }

        self.stats.events_published += 1;
        let deliveries = self.bus.publish(event);
        self.queue.extend(deliveries.into_iter().map(Work::Deliver));
    }

    fn deliver(&mut self, delivery: &Delivery) {
        let id = delivery.subscriber;
        let event = delivery.event.as_ref();
        let Some(slot) = self.slots.get(&id) else {
            return;
        };
        if slot.lifecycle != LifecycleState::Active
            || !self.bus.is_subscribed(id, event.topic.as_str())
        {
            debug!(instance = %id, topic = %event.topic, "delivery to inactive subscriber dropped");
            return;
        }
        if !slot.component.accepts(event) {
            self.stats.rejected_by_guard += 1;
            debug!(instance = %id, topic = %event.topic, "event rejected by guard");
            return;
        }
        self.stats.deliveries += 1;
        self.invoke(id, Hook::Event(event));
    }

    /// Drops the subscriptions, owned feeds and state of `id`. Idempotent.
    fn clean_up(&mut self, id: InstanceId) {
        self.invoke(id, Hook::CleanUp);
        self.bus.unsubscribe_all(id);
        self.feeds.remove_owned_by(id);
        self.state.clear_instance_state(id);
        debug!(instance = %id, "instance cleaned up");
    }

    /// Runs one hook of `id` and queues what it asked for.
    ///
    /// Returns `false` if the hook failed; its requests are discarded then.
    fn invoke(&mut self, id: InstanceId, hook: Hook<'_>) -> bool {
        let Some(slot) = self.slots.get(&id) else {
            return false;
        };
        let mut requests = Vec::new();
        let result: HookResult = {
            let mut ctx = Context::new(
                id,
                &slot.descriptor,
                &slot.successors,
                &self.state,
                &self.feeds,
                &mut self.bus,
                &mut requests,
            );
            match hook {
                Hook::GameStart => slot.component.on_game_start(&mut ctx),
                Hook::Start => slot.component.on_start(&mut ctx),
                Hook::Event(event) => slot.component.on_event(&mut ctx, event),
                Hook::Complete => slot.component.on_complete(&mut ctx),
                Hook::CleanUp => slot.component.on_clean_up(&mut ctx),
            }
        };

        match result {
            Ok(()) => {
                self.queue.extend(requests.into_iter().map(Work::from));
                true
            }
            Err(err) => {
                self.stats.handler_failures += 1;
                warn!(
                    instance = %id,
                    hook = hook.name(),
                    discarded = requests.len(),
                    error = %err,
                    "handler failed"
                );
                false
            }
        }
    }

    fn armed(&self, id: InstanceId) -> bool {
        self.slots
            .get(&id)
            .is_some_and(|slot| !slot.descriptor.flags.default_start_enabled)
    }

    fn set_lifecycle(&mut self, id: InstanceId, next: LifecycleState) {
        if let Some(slot) = self.slots.get_mut(&id) {
            if slot.lifecycle != next {
                debug!(instance = %id, from = %slot.lifecycle, to = %next, "transition");
                slot.lifecycle = next;
                self.stats.transitions += 1;
            }
        }
    }

    fn ignore_target(&mut self, action: &'static str, id: InstanceId) {
        self.stats.ignored_targets += 1;
        warn!(instance = %id, action, "no such instance, signal ignored");
    }
}
