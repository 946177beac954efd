//! Runtime configuration.

/// Default capacity of the runner's command channel.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Default cap on work items processed per drain.
pub const DEFAULT_MAX_STEPS_PER_DRAIN: usize = 10_000;

/// Tunables of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Capacity of the bounded command channel in front of the scheduler.
    pub queue_capacity: usize,
    /// Upper bound of work items handled for one external command. Guards
    /// against graphs that reset each other forever.
    pub max_steps_per_drain: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_steps_per_drain: DEFAULT_MAX_STEPS_PER_DRAIN,
        }
    }
}
