//! The state store.

use std::collections::BTreeMap;

use parkmyst_core::error::GameError;
use parkmyst_core::instance::InstanceId;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::slots::Slots;

/// Per-instance isolated state plus named shared state.
///
/// Values are stored as JSON and converted on access, so each component kind
/// keeps its own typed state. Missing state decodes to `T::default()`.
#[derive(Debug, Default)]
pub struct StateStore {
    instances: Slots<InstanceId>,
    shared: Slots<String>,
}

fn decode<T: DeserializeOwned + Default>(value: &Value) -> Result<T, GameError> {
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(T::deserialize(value)?)
}

fn encode<T: Serialize>(value: &T) -> Result<Value, GameError> {
    Ok(serde_json::to_value(value)?)
}

/// Decodes, mutates and re-encodes `slot` in place.
fn modify<T, R>(slot: &mut Value, f: impl FnOnce(&mut T) -> R) -> Result<R, GameError>
where
    T: Serialize + DeserializeOwned + Default,
{
    let mut typed: T = decode(slot)?;
    let result = f(&mut typed);
    *slot = encode(&typed)?;
    Ok(result)
}

impl StateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the state of `instance`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::State` if the stored value does not decode as `T`.
    pub fn instance_state<T: DeserializeOwned + Default>(
        &self,
        instance: InstanceId,
    ) -> Result<T, GameError> {
        decode(&self.instances.get(&instance))
    }

    /// Replaces the state of `instance` wholesale.
    ///
    /// # Errors
    ///
    /// Returns `GameError::State` if `value` cannot be serialized.
    pub fn set_instance_state<T: Serialize>(
        &self,
        instance: InstanceId,
        value: &T,
    ) -> Result<(), GameError> {
        self.instances.set(&instance, encode(value)?);
        Ok(())
    }

    /// Atomic read-modify-write of the state of `instance`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::State` if the stored value does not decode as `T`;
    /// the closure is not called in that case.
    pub fn update_instance_state<T, R>(
        &self,
        instance: InstanceId,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, GameError>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        self.instances.update(&instance, |slot| modify(slot, f))
    }

    /// Raw JSON state of `instance`; `Value::Null` if none.
    #[must_use]
    pub fn raw_instance_state(&self, instance: InstanceId) -> Value {
        self.instances.get(&instance)
    }

    /// Drops the state of `instance`. Safe to call when nothing was stored.
    pub fn clear_instance_state(&self, instance: InstanceId) {
        if self.instances.clear(&instance) {
            debug!(instance = %instance, "instance state cleared");
        }
    }

    /// Reads the shared state under `key`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::State` if the stored value does not decode as `T`.
    pub fn shared_state<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, GameError> {
        decode(&self.shared.get(&key.to_owned()))
    }

    /// Replaces the shared state under `key` wholesale.
    ///
    /// # Errors
    ///
    /// Returns `GameError::State` if `value` cannot be serialized.
    pub fn set_shared_state<T: Serialize>(&self, key: &str, value: &T) -> Result<(), GameError> {
        self.shared.set(&key.to_owned(), encode(value)?);
        Ok(())
    }

    /// Atomic read-modify-write of the shared state under `key`.
    ///
    /// Concurrent calls on the same key run one after the other; calls on
    /// different keys do not wait for each other.
    ///
    /// # Errors
    ///
    /// Returns `GameError::State` if the stored value does not decode as `T`.
    pub fn update_shared_state<T, R>(
        &self,
        key: &str,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, GameError>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        self.shared.update(&key.to_owned(), |slot| modify(slot, f))
    }

    /// Keys currently present in the shared namespace, sorted.
    #[must_use]
    pub fn shared_keys(&self) -> Vec<String> {
        let mut keys = self.shared.keys();
        keys.sort();
        keys
    }

    /// Copy of the whole shared namespace.
    #[must_use]
    pub fn shared_snapshot(&self) -> BTreeMap<String, Value> {
        self.shared
            .keys()
            .into_iter()
            .map(|key| {
                let value = self.shared.get(&key);
                (key, value)
            })
            .collect()
    }

    /// Drops every instance and shared entry at session end.
    pub fn clear(&self) {
        self.instances.clear_all();
        self.shared.clear_all();
        debug!("state store cleared");
    }
}
