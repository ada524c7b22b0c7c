//! Plain objects.

use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

use crate::{Value, ValueError};

#[derive(Debug, Default)]
struct ObjectData {
    entries: IndexMap<String, Value>,
    frozen: bool,
}

/// Shared handle to a plain object.
///
/// Keys keep insertion order. Once [`ObjectRef::freeze`] has been called
/// every mutating method fails with [`ValueError::Frozen`].
#[derive(Clone, Default)]
pub struct ObjectRef(Rc<RefCell<ObjectData>>);

impl ObjectRef {
    /// Create an empty, unfrozen object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an object from `(key, value)` pairs. Later duplicates win.
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let entries = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self(Rc::new(RefCell::new(ObjectData {
            entries,
            frozen: false,
        })))
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.borrow().entries.get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.borrow().entries.contains_key(key)
    }

    /// Insert or replace `key`, returning the previous value.
    pub fn insert(&self, key: impl Into<String>, value: Value) -> Result<Option<Value>, ValueError> {
        let key = key.into();
        let mut data = self.0.borrow_mut();
        if data.frozen {
            return Err(ValueError::Frozen { key });
        }
        Ok(data.entries.insert(key, value))
    }

    /// Remove `key`, keeping the order of the remaining keys.
    pub fn remove(&self, key: &str) -> Result<Option<Value>, ValueError> {
        let mut data = self.0.borrow_mut();
        if data.frozen {
            return Err(ValueError::Frozen {
                key: key.to_string(),
            });
        }
        Ok(data.entries.shift_remove(key))
    }

    pub fn clear(&self) -> Result<(), ValueError> {
        let mut data = self.0.borrow_mut();
        if data.frozen {
            return Err(ValueError::Frozen { key: String::new() });
        }
        data.entries.clear();
        Ok(())
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().entries.keys().cloned().collect()
    }

    /// Snapshot of the own entries in insertion order.
    ///
    /// The snapshot holds handles, not copies, and releases the borrow so
    /// callers may mutate this object while walking it.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0
            .borrow()
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().entries.is_empty()
    }

    /// Shallow freeze: this object rejects mutation, its values are untouched.
    pub fn freeze(&self) {
        self.0.borrow_mut().frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.0.borrow().frozen
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}
