//! Static messages.
//!
//! Both kinds show their content and pass activation on at once. They never
//! complete on their own; the content stays until the instance is reset or
//! ended.

use parkmyst_core::error::GameError;
use parkmyst_runtime::{
    Component, Context, Descriptor, DescriptorRegistry, FeedTemplate, HookResult, factory,
};
use serde::Deserialize;
use serde_json::json;

const HTML_FEEDS: &[FeedTemplate] = &[FeedTemplate::public("message")];
const IMAGE_FEEDS: &[FeedTemplate] = &[FeedTemplate::public("imageMessage")];

/// Shows custom HTML content.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HtmlMessage {
    message: String,
}

impl Component for HtmlMessage {
    fn on_start(&self, ctx: &mut Context<'_>) -> HookResult {
        ctx.create_feed("message", json!({ "message": self.message }));
        ctx.start_successors();
        Ok(())
    }
}

/// Shows an image.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageMessage {
    url: String,
    #[serde(default)]
    alt: String,
}

impl Component for ImageMessage {
    fn on_start(&self, ctx: &mut Context<'_>) -> HookResult {
        ctx.create_feed("imageMessage", json!({ "url": self.url, "alt": self.alt }));
        ctx.start_successors();
        Ok(())
    }
}

pub(crate) fn register(registry: &mut DescriptorRegistry) -> Result<(), GameError> {
    registry.register(
        Descriptor::new("HtmlMessage", "Shows custom HTML content to the participants.")
            .with_fields(&["message"])
            .with_feeds(HTML_FEEDS)
            .without_clean_up_on_completion(),
        factory::<HtmlMessage>,
    )?;
    registry.register(
        Descriptor::new("ImageMessage", "Shows an image to the participants.")
            .with_fields(&["url"])
            .with_feeds(IMAGE_FEEDS)
            .without_clean_up_on_completion(),
        factory::<ImageMessage>,
    )
}
