//! Keyed value cells with one lock per key.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

type Cell = Arc<Mutex<Value>>;

/// Recovers the guard of a poisoned lock; cell contents are plain JSON and
/// stay consistent even if a writer panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
pub(crate) struct Slots<K> {
    cells: Mutex<HashMap<K, Cell>>,
}

impl<K> Default for Slots<K> {
    fn default() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone> Slots<K> {
    /// Returns the cell for `key`, creating an empty one on first use.
    ///
    /// The map lock is released before the caller locks the cell.
    fn cell(&self, key: &K) -> Cell {
        let mut cells = lock(&self.cells);
        Arc::clone(
            cells
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(Value::Null))),
        )
    }

    pub(crate) fn get(&self, key: &K) -> Value {
        let cell = lock(&self.cells).get(key).cloned();
        match cell {
            Some(cell) => lock(&cell).clone(),
            None => Value::Null,
        }
    }

    pub(crate) fn set(&self, key: &K, value: Value) {
        let cell = self.cell(key);
        *lock(&cell) = value;
    }

    pub(crate) fn update<R>(&self, key: &K, f: impl FnOnce(&mut Value) -> R) -> R {
        let cell = self.cell(key);
        let mut guard = lock(&cell);
        f(&mut guard)
    }

    /// Drops the value under `key`. Returns `true` if there was a non-null
    /// value.
    pub(crate) fn clear(&self, key: &K) -> bool {
        let cell = lock(&self.cells).remove(key);
        cell.is_some_and(|cell| !lock(&cell).is_null())
    }

    pub(crate) fn keys(&self) -> Vec<K> {
        lock(&self.cells).keys().cloned().collect()
    }

    pub(crate) fn clear_all(&self) {
        lock(&self.cells).clear();
    }
}
