//! Logic gates.

use parkmyst_core::error::GameError;
use parkmyst_core::instance::InstanceId;
use parkmyst_runtime::{Component, Context, Descriptor, DescriptorRegistry, HookResult, factory};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a [`Threshold`] compares its activation count with `amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdPolicy {
    /// Passes once activated more than `amount` times.
    Over,
    /// Passes while activated fewer than `amount` times.
    Until,
    /// Passes only on exactly the `amount`-th activation.
    Equals,
}

impl ThresholdPolicy {
    /// Returns `true` if the `activations`-th activation passes.
    #[must_use]
    pub fn passes(self, amount: u32, activations: u32) -> bool {
        match self {
            Self::Over => amount < activations,
            Self::Until => amount > activations,
            Self::Equals => amount == activations,
        }
    }
}

/// Counts activations and forwards each one to `onTrue` or `onFalse`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Threshold {
    #[serde(rename = "type")]
    policy: ThresholdPolicy,
    amount: u32,
    on_true: InstanceId,
    on_false: InstanceId,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ThresholdState {
    activations: u32,
}

impl Component for Threshold {
    fn on_game_start(&self, ctx: &mut Context<'_>) -> HookResult {
        ctx.set_state(&ThresholdState::default())
    }

    fn on_start(&self, ctx: &mut Context<'_>) -> HookResult {
        let activations = ctx.update_state(|state: &mut ThresholdState| {
            state.activations += 1;
            state.activations
        })?;
        let passed = self.policy.passes(self.amount, activations);
        debug!(instance = %ctx.id(), activations, passed, "threshold activated");
        ctx.start(if passed { self.on_true } else { self.on_false });
        Ok(())
    }
}

pub(crate) fn register(registry: &mut DescriptorRegistry) -> Result<(), GameError> {
    registry.register(
        Descriptor::new(
            "Threshold",
            "Counts activations. 'over' passes after more than 'amount' activations, \
             'equals' only on exactly 'amount', 'until' while below 'amount'. \
             A passing activation fires onTrue, any other fires onFalse.",
        )
        .with_fields(&["type", "amount", "onTrue", "onFalse"])
        .without_successor_list()
        .without_clean_up_on_completion()
        .without_default_start(),
        factory::<Threshold>,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equals_passes_only_on_the_amount() {
        let passes: Vec<bool> = (1..=4)
            .map(|n| ThresholdPolicy::Equals.passes(3, n))
            .collect();

        assert_eq!(passes, vec![false, false, true, false]);
    }

    #[test]
    fn test_over_and_until_are_strict() {
        assert!(!ThresholdPolicy::Over.passes(2, 2));
        assert!(ThresholdPolicy::Over.passes(2, 3));
        assert!(ThresholdPolicy::Until.passes(2, 1));
        assert!(!ThresholdPolicy::Until.passes(2, 2));
    }

    #[test]
    fn test_policy_reads_lowercase_names() {
        let policy: ThresholdPolicy = serde_json::from_str("\"until\"").unwrap();

        assert_eq!(policy, ThresholdPolicy::Until);
    }
}
