//! The capability interface every component kind implements.

use std::fmt;

use parkmyst_core::error::GameError;
use parkmyst_core::event::Event;

use crate::context::Context;

/// Outcome of a component hook.
pub type HookResult = Result<(), GameError>;

/// Behaviour of one component kind.
///
/// A value of the implementing type is the immutable configuration of one
/// instance; mutable data lives in the state store and is reached through
/// the [`Context`]. Hooks run one at a time per instance.
pub trait Component: Send + Sync + fmt::Debug {
    /// Called once for every instance when the game starts, before any
    /// auto-start. Also re-run when an armed (non default-start) instance is
    /// reset.
    fn on_game_start(&self, _ctx: &mut Context<'_>) -> HookResult {
        Ok(())
    }

    /// Called when the instance is started.
    fn on_start(&self, ctx: &mut Context<'_>) -> HookResult;

    /// Guard run before [`Component::on_event`]; rejected events are dropped
    /// for this subscriber only.
    fn accepts(&self, _event: &Event) -> bool {
        true
    }

    /// Called for every accepted event on a subscribed topic while active.
    fn on_event(&self, _ctx: &mut Context<'_>, _event: &Event) -> HookResult {
        Ok(())
    }

    /// Called when the instance completes, before successors are started.
    fn on_complete(&self, _ctx: &mut Context<'_>) -> HookResult {
        Ok(())
    }

    /// Called at clean-up, before the runtime drops the instance's
    /// subscriptions, owned feeds and state.
    fn on_clean_up(&self, _ctx: &mut Context<'_>) -> HookResult {
        Ok(())
    }
}
