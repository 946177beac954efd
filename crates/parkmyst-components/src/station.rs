//! Staffed stations.

use parkmyst_core::error::GameError;
use parkmyst_core::event::Event;
use parkmyst_core::identity::PermissionTier;
use parkmyst_runtime::{
    Component, Context, Descriptor, DescriptorRegistry, FeedTemplate, HookResult, factory,
};
use serde::Deserialize;
use serde_json::json;

/// Topic a controller publishes to let participants pass.
pub const STATION_COMPLETED: &str = "stationCompleted";

const FEEDS: &[FeedTemplate] = &[
    FeedTemplate::public("stationUserWaiting"),
    FeedTemplate::restricted("stationController", PermissionTier::Controller),
];

/// Holds participants until a controller confirms the station's task.
///
/// Participants see a waiting notice; controllers and admins additionally see
/// the control form.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Station {}

impl Component for Station {
    fn on_start(&self, ctx: &mut Context<'_>) -> HookResult {
        ctx.create_feed("stationUserWaiting", json!({}));
        ctx.create_feed("stationController", json!({}));
        ctx.subscribe(STATION_COMPLETED);
        Ok(())
    }

    fn accepts(&self, event: &Event) -> bool {
        event.topic.as_str() == STATION_COMPLETED && event.sender.is_privileged()
    }

    fn on_event(&self, ctx: &mut Context<'_>, _event: &Event) -> HookResult {
        ctx.complete();
        Ok(())
    }
}

pub(crate) fn register(registry: &mut DescriptorRegistry) -> Result<(), GameError> {
    registry.register(
        Descriptor::new(
            "Station",
            "Waits until a station controller lets the participants continue.",
        )
        .with_feeds(FEEDS),
        factory::<Station>,
    )
}
