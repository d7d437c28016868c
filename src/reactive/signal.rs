//! Signal - a named collection of reactive cells.
//!
//! Each key is backed by its own [`Subject`]. The key set is fixed at
//! creation: reading or writing an unknown key fails with
//! [`SignalError::UnknownKey`] instead of creating a new cell.
//!
//! # Example
//!
//! ```ignore
//! use spark_components::reactive::Signal;
//!
//! let form = Signal::create([("name", String::new()), ("email", String::new())]);
//! form.get("name")?.observe(|name| println!("name = {name}"));
//! form.set("name", "Ada".to_string())?;
//! assert!(form.set("age", "36".to_string()).is_err());
//! ```

use std::rc::Rc;

use indexmap::IndexMap;

use super::signal_value::SignalValue;
use super::subject::Subject;
use crate::error::SignalError;

/// Keyed reactive state. Cloning yields another handle to the same cells.
pub struct Signal<V> {
    cells: Rc<IndexMap<Rc<str>, Subject<V>>>,
}

impl<V> Clone for Signal<V> {
    fn clone(&self) -> Self {
        Self {
            cells: self.cells.clone(),
        }
    }
}

impl<V: Clone + 'static> Signal<V> {
    /// Create one cell per key, seeded with its initial value.
    ///
    /// Keys keep declaration order. A repeated key keeps its first position
    /// and its last value.
    pub fn create<K: Into<String>>(initial: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut cells: IndexMap<Rc<str>, Subject<V>> = IndexMap::new();
        for (key, value) in initial {
            let key: Rc<str> = Rc::from(key.into());
            let cell = cells.entry(key).or_insert_with(Subject::new);
            cell.emit(value);
        }
        Self {
            cells: Rc::new(cells),
        }
    }

    fn cell(&self, key: &str) -> Result<(&Rc<str>, &Subject<V>), SignalError> {
        self.cells
            .get_key_value(key)
            .ok_or_else(|| SignalError::UnknownKey(key.to_string()))
    }

    /// Reactive handle on the field `key`.
    pub fn get(&self, key: &str) -> Result<SignalValue<V>, SignalError> {
        let (key, cell) = self.cell(key)?;
        Ok(SignalValue::direct(cell.clone(), key.clone()))
    }

    /// Write the field `key`, notifying its observers synchronously.
    pub fn set(&self, key: &str, value: V) -> Result<(), SignalError> {
        let (_, cell) = self.cell(key)?;
        tracing::trace!(key, "signal set");
        cell.emit(value);
        Ok(())
    }

    /// Snapshot of every raw value, in declaration order.
    pub fn get_value(&self) -> IndexMap<String, V> {
        self.cells
            .iter()
            .filter_map(|(key, cell)| cell.get_value().map(|value| (key.to_string(), value)))
            .collect()
    }

    /// Current raw value of `key`, `None` for unknown keys.
    pub fn raw(&self, key: &str) -> Option<V> {
        self.cells.get(key).and_then(Subject::get_value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(|key| key.as_ref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.cells.contains_key(key)
    }
}

// =============================================================================
// Tests
// =============================================================================
