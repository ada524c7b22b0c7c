//! Keyed collections: `Map` and `Set`.
//!
//! Both keep insertion order and compare keys with SameValueZero, see
//! [`ValueKey`].

use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

use crate::{Value, ValueKey};

/// Shared handle to a `Map`.
#[derive(Clone, Default)]
pub struct MapRef(Rc<RefCell<IndexMap<ValueKey, (Value, Value)>>>);

impl MapRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let map = Self::new();
        for (k, v) in entries {
            map.set(k, v);
        }
        map
    }

    pub fn get(&self, key: &Value) -> Option<Value> {
        self.0
            .borrow()
            .get(&ValueKey::of(key))
            .map(|(_, v)| v.clone())
    }

    pub fn has(&self, key: &Value) -> bool {
        self.0.borrow().contains_key(&ValueKey::of(key))
    }

    /// Insert or update. An existing key keeps its position and original key value.
    pub fn set(&self, key: Value, value: Value) {
        let mut map = self.0.borrow_mut();
        let id = ValueKey::of(&key);
        if let Some(slot) = map.get_mut(&id) {
            slot.1 = value;
            return;
        }
        map.insert(id, (key, value));
    }

    pub fn delete(&self, key: &Value) -> bool {
        self.0.borrow_mut().shift_remove(&ValueKey::of(key)).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Snapshot of `[key, value]` pairs in insertion order.
    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.0.borrow().values().cloned().collect()
    }

    pub fn ptr_eq(&self, other: &MapRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

/// Shared handle to a `Set`.
#[derive(Clone, Default)]
pub struct SetRef(Rc<RefCell<IndexMap<ValueKey, Value>>>);

impl SetRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        let set = Self::new();
        for v in values {
            set.add(v);
        }
        set
    }

    /// Add a member; returns false if an equal member was already present.
    pub fn add(&self, value: Value) -> bool {
        let mut set = self.0.borrow_mut();
        let key = ValueKey::of(&value);
        if set.contains_key(&key) {
            return false;
        }
        set.insert(key, value);
        true
    }

    pub fn has(&self, value: &Value) -> bool {
        self.0.borrow().contains_key(&ValueKey::of(value))
    }

    pub fn delete(&self, value: &Value) -> bool {
        self.0.borrow_mut().shift_remove(&ValueKey::of(value)).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn values(&self) -> Vec<Value> {
        self.0.borrow().values().cloned().collect()
    }

    pub fn ptr_eq(&self, other: &SetRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}
