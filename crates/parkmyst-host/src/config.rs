//! Environment configuration.

use std::path::PathBuf;

use parkmyst_runtime::GameConfig;

use crate::error::HostError;

/// Path of the game graph document.
pub const GAME_VAR: &str = "PARKMYST_GAME";
/// Capacity of the command channel.
pub const QUEUE_CAPACITY_VAR: &str = "PARKMYST_QUEUE_CAPACITY";
/// Runaway guard of the scheduler.
pub const MAX_STEPS_VAR: &str = "PARKMYST_MAX_STEPS";

/// Settings of one host process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Game graph document, JSON or YAML.
    pub game_path: PathBuf,
    /// Scheduler settings.
    pub game: GameConfig,
}

impl HostConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `HostError::Config` if `PARKMYST_GAME` is unset or a numeric
    /// variable does not parse.
    pub fn from_env() -> Result<Self, HostError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`HostConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, HostError> {
        let game_path = lookup(GAME_VAR)
            .map(PathBuf::from)
            .ok_or_else(|| HostError::Config(format!("{GAME_VAR} environment variable must be set")))?;

        let defaults = GameConfig::default();
        let game = GameConfig {
            queue_capacity: parse_or(&lookup, QUEUE_CAPACITY_VAR, defaults.queue_capacity)?,
            max_steps_per_drain: parse_or(&lookup, MAX_STEPS_VAR, defaults.max_steps_per_drain)?,
        };
        if game.queue_capacity == 0 {
            return Err(HostError::Config(format!("{QUEUE_CAPACITY_VAR} must be positive")));
        }

        Ok(Self { game_path, game })
    }
}

fn parse_or(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: usize,
) -> Result<usize, HostError> {
    match lookup(name) {
        Some(raw) => raw
            .parse()
            .map_err(|e| HostError::Config(format!("{name} must be a valid usize: {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_apply_when_only_game_is_set() {
        let config = HostConfig::from_lookup(lookup(&[(GAME_VAR, "games/tour.yaml")])).unwrap();

        assert_eq!(config.game_path, PathBuf::from("games/tour.yaml"));
        assert_eq!(config.game, GameConfig::default());
    }

    #[test]
    fn test_numeric_overrides_are_read() {
        let config = HostConfig::from_lookup(lookup(&[
            (GAME_VAR, "tour.json"),
            (QUEUE_CAPACITY_VAR, "8"),
            (MAX_STEPS_VAR, "500"),
        ]))
        .unwrap();

        assert_eq!(config.game.queue_capacity, 8);
        assert_eq!(config.game.max_steps_per_drain, 500);
    }

    #[test]
    fn test_missing_game_is_a_config_error() {
        let result = HostConfig::from_lookup(lookup(&[]));

        assert!(matches!(result, Err(HostError::Config(msg)) if msg.contains(GAME_VAR)));
    }

    #[test]
    fn test_bad_number_is_a_config_error() {
        let result = HostConfig::from_lookup(lookup(&[(GAME_VAR, "g.json"), (MAX_STEPS_VAR, "lots")]));

        assert!(matches!(result, Err(HostError::Config(_))));
    }
}
