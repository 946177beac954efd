//! QR code checkpoints.

use parkmyst_core::error::GameError;
use parkmyst_core::event::{Event, topics};
use parkmyst_core::instance::InstanceId;
use parkmyst_runtime::{Component, Context, Descriptor, DescriptorRegistry, HookResult, factory};
use serde::Deserialize;

/// Completes when a participant scans `code`, then starts `nextComponent`.
///
/// The declared successor list is not used.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QrCode {
    code: String,
    #[serde(default)]
    next_component: InstanceId,
}

impl Component for QrCode {
    fn on_start(&self, ctx: &mut Context<'_>) -> HookResult {
        ctx.subscribe(topics::QR_CODE);
        Ok(())
    }

    fn accepts(&self, event: &Event) -> bool {
        event.str_field("code").is_some()
    }

    fn on_event(&self, ctx: &mut Context<'_>, event: &Event) -> HookResult {
        if event.str_field("code") == Some(self.code.as_str()) {
            ctx.complete();
        }
        Ok(())
    }

    fn on_complete(&self, ctx: &mut Context<'_>) -> HookResult {
        ctx.start(self.next_component);
        Ok(())
    }
}

pub(crate) fn register(registry: &mut DescriptorRegistry) -> Result<(), GameError> {
    registry.register(
        Descriptor::new("QrCode", "Waits until the participants scan the configured code.")
            .with_fields(&["code"])
            .without_successor_list(),
        factory::<QrCode>,
    )
}
