//! Bounded-depth freezing
//!
//! Freezes a plain object and, up to a depth budget, the plain objects
//! below it. Arrays, Maps, Sets and other kinds are left as found and not
//! descended into. A node that is already frozen is never revisited.

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::rc::Rc;

use knit_value::Value;

use crate::clone::{clone, deep_clone, CloneOptions};
use crate::error::CloneError;

/// Custom clone hook: receives the value and the freeze depth budget.
pub type CloneHook = Rc<dyn Fn(&Value, Option<usize>) -> Value>;

/// Whether [`freeze`] copies its input first.
#[derive(Clone, Default)]
pub enum FreezeClone {
    /// Freeze the input in place and return the same handle.
    #[default]
    None,
    /// Deep clone, then freeze the copy.
    Deep,
    /// Clone with the given options, then freeze the copy.
    With(CloneOptions),
    /// Let the hook produce the value to freeze.
    Custom(CloneHook),
}

impl FreezeClone {
    pub fn custom(hook: impl Fn(&Value, Option<usize>) -> Value + 'static) -> Self {
        FreezeClone::Custom(Rc::new(hook))
    }
}

impl fmt::Debug for FreezeClone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FreezeClone::None => f.write_str("None"),
            FreezeClone::Deep => f.write_str("Deep"),
            FreezeClone::With(opts) => f.debug_tuple("With").field(opts).finish(),
            FreezeClone::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Config form: `clone = true | false | { strategy = "...", max_depth = N }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum FreezeCloneRepr {
    Flag(bool),
    Options(CloneOptions),
}

impl<'de> Deserialize<'de> for FreezeClone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match FreezeCloneRepr::deserialize(deserializer)? {
            FreezeCloneRepr::Flag(true) => FreezeClone::Deep,
            FreezeCloneRepr::Flag(false) => FreezeClone::None,
            FreezeCloneRepr::Options(opts) => FreezeClone::With(opts),
        })
    }
}

/// Options for [`freeze`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FreezeOptions {
    pub clone: FreezeClone,

    /// Levels below the root that are frozen too. `None` freezes every
    /// reachable plain object.
    pub max_depth: Option<usize>,
}

impl Default for FreezeOptions {
    fn default() -> Self {
        Self {
            clone: FreezeClone::None,
            max_depth: Some(1),
        }
    }
}

impl FreezeOptions {
    pub fn unbounded() -> Self {
        Self {
            max_depth: None,
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_clone(mut self, clone: FreezeClone) -> Self {
        self.clone = clone;
        self
    }
}

/// Freeze `value` and its plain-object descendants up to `opts.max_depth`.
///
/// Without a clone option the input itself is frozen and returned, so every
/// alias of it observes the change.
pub fn freeze(value: &Value, opts: &FreezeOptions) -> Result<Value, CloneError> {
    if value.is_frozen() {
        tracing::trace!("freeze skipped: value already frozen");
        return Ok(value.clone());
    }

    let target = match &opts.clone {
        FreezeClone::None => value.clone(),
        FreezeClone::Deep => deep_clone(value),
        FreezeClone::With(clone_opts) => clone(value, clone_opts)?,
        FreezeClone::Custom(hook) => hook(value, opts.max_depth),
    };

    freeze_node(&target, opts.max_depth);
    Ok(target)
}

// The node is frozen before its children are visited, which also stops a
// cycle from re-entering it.
fn freeze_node(value: &Value, depth: Option<usize>) {
    let Value::Object(obj) = value else {
        return;
    };
    if obj.is_frozen() {
        return;
    }
    obj.freeze();

    if depth == Some(0) {
        return;
    }
    let next = depth.map(|d| d - 1);
    for (_, child) in obj.entries() {
        freeze_node(&child, next);
    }
}
