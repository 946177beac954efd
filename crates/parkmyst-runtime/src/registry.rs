//! Registry of the component kinds known to the runtime.

use std::collections::HashMap;

use parkmyst_core::error::GameError;
use parkmyst_core::instance::InstanceId;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::component::Component;
use crate::descriptor::Descriptor;

/// Builds a component from its raw configuration.
pub type ComponentFactory = fn(Value) -> Result<Box<dyn Component>, serde_json::Error>;

/// Factory for component types that deserialize straight from their
/// configuration.
///
/// # Errors
///
/// Returns the deserialization error if `config` does not fit `C`.
pub fn factory<C>(config: Value) -> Result<Box<dyn Component>, serde_json::Error>
where
    C: Component + DeserializeOwned + 'static,
{
    let component: C = serde_json::from_value(config)?;
    Ok(Box::new(component))
}

#[derive(Debug)]
struct Registration {
    descriptor: Descriptor,
    factory: ComponentFactory,
}

/// Registry of component kinds.
///
/// Filled once at start-up, then shared read-only between games.
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    entries: HashMap<&'static str, Registration>,
}

impl DescriptorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component kind.
    ///
    /// # Errors
    ///
    /// Returns `GameError::DuplicateKind` if the kind is already registered.
    pub fn register(
        &mut self,
        descriptor: Descriptor,
        factory: ComponentFactory,
    ) -> Result<(), GameError> {
        if self.entries.contains_key(descriptor.kind) {
            return Err(GameError::DuplicateKind(descriptor.kind.to_owned()));
        }
        debug!(kind = descriptor.kind, "component kind registered");
        self.entries.insert(
            descriptor.kind,
            Registration {
                descriptor,
                factory,
            },
        );
        Ok(())
    }

    /// Looks up the descriptor of `kind`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::UnknownKind` if the kind is not registered.
    pub fn lookup(&self, kind: &str) -> Result<&Descriptor, GameError> {
        self.entries
            .get(kind)
            .map(|registration| &registration.descriptor)
            .ok_or_else(|| GameError::UnknownKind(kind.to_owned()))
    }

    /// Registered kind names, sorted.
    #[must_use]
    pub fn kinds(&self) -> Vec<&'static str> {
        let mut kinds: Vec<&'static str> = self.entries.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }

    /// Number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Creates the component of instance `id` from its configuration.
    ///
    /// A `null` configuration is treated as an empty object.
    ///
    /// # Errors
    ///
    /// Returns `GameError::UnknownKind` for an unregistered kind and
    /// `GameError::InvalidConfiguration` if a required field is missing or the
    /// configuration does not deserialize into the kind's type.
    pub fn instantiate(
        &self,
        id: InstanceId,
        kind: &str,
        config: Value,
    ) -> Result<(Descriptor, Box<dyn Component>), GameError> {
        let registration = self
            .entries
            .get(kind)
            .ok_or_else(|| GameError::UnknownKind(kind.to_owned()))?;
        let descriptor = registration.descriptor;
        let invalid = |reason: String| GameError::InvalidConfiguration {
            instance: id,
            kind: kind.to_owned(),
            reason,
        };

        let config = match config {
            Value::Null => Value::Object(Map::new()),
            Value::Object(fields) => {
                if let Some(missing) = descriptor
                    .required_fields
                    .iter()
                    .find(|field| !fields.contains_key(**field))
                {
                    return Err(invalid(format!("missing field `{missing}`")));
                }
                Value::Object(fields)
            }
            other => return Err(invalid(format!("expected an object, got {other}"))),
        };

        let component = (registration.factory)(config).map_err(|e| invalid(e.to_string()))?;
        Ok((descriptor, component))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::component::HookResult;
    use crate::context::Context;

    #[derive(Debug, Deserialize)]
    struct Echo {
        #[allow(dead_code)]
        text: String,
    }

    impl Component for Echo {
        fn on_start(&self, ctx: &mut Context<'_>) -> HookResult {
            ctx.complete();
            Ok(())
        }
    }

    fn echo_descriptor() -> Descriptor {
        Descriptor::new("Echo", "completes immediately").with_fields(&["text"])
    }

    #[test]
    fn test_register_rejects_duplicate_kind() {
        let mut registry = DescriptorRegistry::new();
        registry.register(echo_descriptor(), factory::<Echo>).unwrap();

        let result = registry.register(echo_descriptor(), factory::<Echo>);

        match result {
            Err(GameError::DuplicateKind(kind)) => assert_eq!(kind, "Echo"),
            other => panic!("expected DuplicateKind, got {other:?}"),
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_unknown_kind() {
        let registry = DescriptorRegistry::new();

        let result = registry.lookup("Nope");

        assert!(matches!(result, Err(GameError::UnknownKind(kind)) if kind == "Nope"));
    }

    #[test]
    fn test_instantiate_builds_component() {
        let mut registry = DescriptorRegistry::new();
        registry.register(echo_descriptor(), factory::<Echo>).unwrap();

        let (descriptor, _component) = registry
            .instantiate(InstanceId::new(1), "Echo", json!({ "text": "hi" }))
            .unwrap();

        assert_eq!(descriptor.kind, "Echo");
        assert_eq!(registry.kinds(), vec!["Echo"]);
    }

    #[test]
    fn test_instantiate_rejects_missing_required_field() {
        let mut registry = DescriptorRegistry::new();
        registry.register(echo_descriptor(), factory::<Echo>).unwrap();

        let result = registry.instantiate(InstanceId::new(4), "Echo", json!({}));

        match result {
            Err(GameError::InvalidConfiguration { instance, reason, .. }) => {
                assert_eq!(instance, InstanceId::new(4));
                assert!(reason.contains("text"));
            }
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn test_instantiate_rejects_wrongly_typed_field() {
        let mut registry = DescriptorRegistry::new();
        registry.register(echo_descriptor(), factory::<Echo>).unwrap();

        let result = registry.instantiate(InstanceId::new(4), "Echo", json!({ "text": 3 }));

        assert!(matches!(result, Err(GameError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_instantiate_rejects_non_object_configuration() {
        let mut registry = DescriptorRegistry::new();
        registry.register(echo_descriptor(), factory::<Echo>).unwrap();

        let result = registry.instantiate(InstanceId::new(4), "Echo", json!([1, 2]));

        assert!(matches!(result, Err(GameError::InvalidConfiguration { .. })));
    }
}
