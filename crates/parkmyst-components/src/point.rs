//! Point systems.
//!
//! Counters live in shared state under [`POINTS_KEY`], one entry per
//! [`PointInitializer`]. Changes travel as [`POINT_EVENT`] events so that
//! any privileged sender can adjust them.

use std::collections::BTreeMap;

use parkmyst_core::error::GameError;
use parkmyst_core::event::Event;
use parkmyst_core::identity::PermissionTier;
use parkmyst_runtime::{
    Component, Context, Descriptor, DescriptorRegistry, FeedTemplate, HookResult, factory,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

/// Shared state key holding every counter.
pub const POINTS_KEY: &str = "points";

/// Topic carrying point changes.
pub const POINT_EVENT: &str = "pointEvent";

const RESULT_FEEDS: &[FeedTemplate] = &[FeedTemplate::public("pointResult")];

/// One counter in shared state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointCounter {
    /// Current score.
    pub point: i64,
}

/// Every counter, keyed by counter id.
pub type PointTable = BTreeMap<String, PointCounter>;

/// Arithmetic applied by a point change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointOperation {
    /// Adds `amount`.
    Add,
    /// Deducts `amount`.
    Remove,
}

/// Payload of a [`POINT_EVENT`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointChange {
    /// Target counter; empty addresses every counter.
    pub counter_id: String,
    /// What to do.
    pub operation: PointOperation,
    /// By how much.
    pub amount: i64,
}

impl PointChange {
    fn signed_amount(&self) -> i64 {
        match self.operation {
            PointOperation::Add => self.amount,
            PointOperation::Remove => self.amount.saturating_neg(),
        }
    }

    fn applies_to(&self, counter: &str) -> bool {
        self.counter_id.is_empty() || self.counter_id == counter
    }
}

/// Owns one counter and applies point changes addressed to it.
///
/// Always active; must be placed for the point system to work.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PointInitializer {
    id: String,
}

impl Component for PointInitializer {
    fn on_start(&self, ctx: &mut Context<'_>) -> HookResult {
        ctx.update_shared(POINTS_KEY, |points: &mut PointTable| {
            points.insert(self.id.clone(), PointCounter::default());
        })?;
        ctx.subscribe(POINT_EVENT);
        Ok(())
    }

    fn accepts(&self, event: &Event) -> bool {
        let allowed = event
            .sender
            .player()
            .is_none_or(|player| player.tier > PermissionTier::User);
        allowed && PointChange::deserialize(&event.payload).is_ok()
    }

    fn on_event(&self, ctx: &mut Context<'_>, event: &Event) -> HookResult {
        let change = PointChange::deserialize(&event.payload)?;
        if !change.applies_to(&self.id) {
            return Ok(());
        }
        let total = ctx.update_shared(POINTS_KEY, |points: &mut PointTable| {
            let counter = points.entry(self.id.clone()).or_default();
            counter.point = counter.point.saturating_add(change.signed_amount());
            counter.point
        })?;
        debug!(counter = %self.id, total, "points changed");
        Ok(())
    }
}

/// Emits one point change, then completes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PointChanger {
    counter_id: String,
    operation: PointOperation,
    amount: i64,
}

impl PointChanger {
    fn change(&self) -> PointChange {
        PointChange {
            counter_id: self.counter_id.clone(),
            operation: self.operation,
            amount: self.amount,
        }
    }
}

impl Component for PointChanger {
    fn on_start(&self, ctx: &mut Context<'_>) -> HookResult {
        ctx.emit(POINT_EVENT, serde_json::to_value(self.change())?);
        ctx.complete();
        Ok(())
    }
}

/// Shows the current score of a counter and stays visible.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PointResult {
    counter_id: String,
}

impl Component for PointResult {
    fn on_start(&self, ctx: &mut Context<'_>) -> HookResult {
        let points: PointTable = ctx.shared(POINTS_KEY)?;
        let score = points.get(&self.counter_id).map_or(-1, |counter| counter.point);
        ctx.create_feed("pointResult", json!({ "points": score }));
        ctx.complete();
        Ok(())
    }
}

pub(crate) fn register(registry: &mut DescriptorRegistry) -> Result<(), GameError> {
    registry.register(
        Descriptor::new(
            "PointInitializer",
            "Always-active counter of a point system. Required for points to work.",
        )
        .with_fields(&["id"])
        .auto_start()
        .without_successor_list(),
        factory::<PointInitializer>,
    )?;
    registry.register(
        Descriptor::new(
            "PointChanger",
            "Adds or removes 'amount' points on the counter named by 'counterId'.",
        )
        .with_fields(&["counterId", "operation", "amount"]),
        factory::<PointChanger>,
    )?;
    registry.register(
        Descriptor::new(
            "PointResult",
            "Shows the score of a counter, starts its successors and stays visible.",
        )
        .with_fields(&["counterId"])
        .with_feeds(RESULT_FEEDS)
        .without_clean_up_on_completion(),
        factory::<PointResult>,
    )
}
