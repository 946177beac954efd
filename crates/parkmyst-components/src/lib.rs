//! Parkmyst — reference component kinds.
//!
//! Flow nodes, logic gates, stations, messages, points, questions and QR
//! codes. [`builtin_registry`] registers all of them.

pub mod flow;
pub mod logic;
pub mod message;
pub mod point;
pub mod qr_code;
pub mod question;
pub mod station;

use parkmyst_core::error::GameError;
use parkmyst_runtime::DescriptorRegistry;

/// A registry holding every kind of this crate.
///
/// # Errors
///
/// Returns `GameError::DuplicateKind` if two modules claim the same kind,
/// which would be a bug in this crate.
pub fn builtin_registry() -> Result<DescriptorRegistry, GameError> {
    let mut registry = DescriptorRegistry::new();
    register_all(&mut registry)?;
    Ok(registry)
}

/// Adds every kind of this crate to `registry`.
///
/// # Errors
///
/// Returns `GameError::DuplicateKind` if one of the kinds is already
/// registered.
pub fn register_all(registry: &mut DescriptorRegistry) -> Result<(), GameError> {
    flow::register(registry)?;
    logic::register(registry)?;
    station::register(registry)?;
    message::register(registry)?;
    point::register(registry)?;
    question::register(registry)?;
    qr_code::register(registry)?;
    Ok(())
}
