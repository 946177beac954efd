//! Parkmyst — runtime.
//!
//! Realizes a game graph: component kinds are registered in a
//! [`DescriptorRegistry`], placed as instances from a [`GameGraph`], and
//! driven through their lifecycle by the [`Game`] scheduler.
//!
//! ```text
//!   GameGraph ──► DescriptorRegistry::instantiate ──► arena of instances
//!                                                        │
//!   publish / reset / end ──► work queue ──► Game::step ─┤─► hooks (Context)
//!                                ▲                       │      │
//!                                └──── requests ◄────────┘◄─────┘
//! ```
//!
//! Hooks never call each other: everything a hook asks for (complete, start,
//! reset, end, emit) is queued and picked up by the scheduling loop.

pub mod component;
pub mod config;
pub mod context;
pub mod descriptor;
pub mod game;
pub mod graph;
pub mod registry;
pub mod runner;

pub use component::{Component, HookResult};
pub use config::GameConfig;
pub use context::Context;
pub use descriptor::{Descriptor, DescriptorFlags, FeedTemplate};
pub use game::{Game, GameStats};
pub use graph::{GameGraph, InstanceSpec};
pub use registry::{ComponentFactory, DescriptorRegistry, factory};
pub use runner::{GameHandle, GameRunner};
