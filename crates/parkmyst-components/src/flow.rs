//! Flow nodes: where a game begins and ends, and remote finish/reset.

use parkmyst_core::error::GameError;
use parkmyst_core::event::topics;
use parkmyst_core::instance::InstanceId;
use parkmyst_runtime::{Component, Context, Descriptor, DescriptorRegistry, HookResult, factory};
use serde::Deserialize;
use serde_json::json;

/// Starts at game start and completes straight away.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StartNode {}

impl Component for StartNode {
    fn on_start(&self, ctx: &mut Context<'_>) -> HookResult {
        ctx.complete();
        Ok(())
    }
}

/// Signals the end of the game when reached.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndNode {}

impl Component for EndNode {
    fn on_start(&self, ctx: &mut Context<'_>) -> HookResult {
        ctx.complete();
        Ok(())
    }

    fn on_complete(&self, ctx: &mut Context<'_>) -> HookResult {
        ctx.emit(topics::GAME_END, json!({}));
        Ok(())
    }
}

/// Ends the instance on its `toFinish` port, then completes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Finisher {
    to_finish: InstanceId,
}

impl Component for Finisher {
    fn on_start(&self, ctx: &mut Context<'_>) -> HookResult {
        ctx.end(self.to_finish);
        ctx.complete();
        Ok(())
    }
}

/// Resets the instance on its `toReset` port, then completes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Resetter {
    to_reset: InstanceId,
}

impl Component for Resetter {
    fn on_start(&self, ctx: &mut Context<'_>) -> HookResult {
        ctx.reset(self.to_reset);
        ctx.complete();
        Ok(())
    }
}

pub(crate) fn register(registry: &mut DescriptorRegistry) -> Result<(), GameError> {
    registry.register(
        Descriptor::new(
            "StartNode",
            "Activates itself when the game starts and finishes shortly after.",
        )
        .auto_start(),
        factory::<StartNode>,
    )?;
    registry.register(
        Descriptor::new("EndNode", "Signals that the game has ended.")
            .without_successor_list()
            .one_shot(),
        factory::<EndNode>,
    )?;
    registry.register(
        Descriptor::new(
            "Finisher",
            "Ends the component on its 'toFinish' port, then starts its successors.",
        )
        .with_fields(&["toFinish"]),
        factory::<Finisher>,
    )?;
    registry.register(
        Descriptor::new(
            "Resetter",
            "Reverts the component on its 'toReset' port to its original state, then starts its successors.",
        )
        .with_fields(&["toReset"]),
        factory::<Resetter>,
    )
}
