//! Value cloning
//!
//! Three strategies:
//! - `shallow`: new top-level array/object, members shared
//! - `deep`: recursive copy, optionally bounded, aliasing preserved
//! - `structured`: deep and unbounded, fails on opaque members
//!
//! A deep traversal keeps an identity map from source node to its copy.
//! The copy is registered before its children are visited, so a
//! self-reference resolves to the copy under construction.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::marker::PhantomData;

use knit_value::{
    is_prototype_pollution_key, ArrayRef, BufferRef, DateRef, MapRef, ObjectRef, OpaqueRef,
    SetRef, Value,
};

use crate::error::CloneError;

/// How [`clone`] copies a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloneStrategy {
    Shallow,
    #[default]
    Deep,
    Structured,
}

/// Options for [`clone`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloneOptions {
    pub strategy: CloneStrategy,

    /// Recursion budget for `deep`. `None` is unbounded; a node reached with
    /// a budget of zero is returned as-is.
    pub max_depth: Option<usize>,
}

impl CloneOptions {
    pub fn shallow() -> Self {
        Self {
            strategy: CloneStrategy::Shallow,
            max_depth: None,
        }
    }

    pub fn deep() -> Self {
        Self::default()
    }

    pub fn structured() -> Self {
        Self {
            strategy: CloneStrategy::Structured,
            max_depth: None,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// Clone `value` according to `opts`.
///
/// Only the `structured` strategy can fail.
pub fn clone(value: &Value, opts: &CloneOptions) -> Result<Value, CloneError> {
    match opts.strategy {
        CloneStrategy::Shallow => Ok(shallow_clone(value)),
        CloneStrategy::Deep => Ok(bounded_clone(value, opts.max_depth)),
        CloneStrategy::Structured => Cloner::<Reject>::new().copy(value, None),
    }
}

/// Unbounded deep clone.
pub fn deep_clone(value: &Value) -> Value {
    bounded_clone(value, None)
}

/// Deep clone with a recursion budget.
pub fn bounded_clone(value: &Value, max_depth: Option<usize>) -> Value {
    match Cloner::<PassThrough>::new().copy(value, max_depth) {
        Ok(v) => v,
        Err(never) => match never {},
    }
}

/// Deep clone a list of values in one traversal, so values shared between
/// elements stay shared in the copies.
pub fn deep_clone_all(values: &[Value]) -> Vec<Value> {
    let mut cloner = Cloner::<PassThrough>::new();
    values
        .iter()
        .map(|v| match cloner.copy(v, None) {
            Ok(v) => v,
            Err(never) => match never {},
        })
        .collect()
}

/// Deep clone that leaves `__proto__`, `constructor` and `prototype` keys
/// out of every copied object.
pub fn sanitized_clone(value: &Value) -> Value {
    match Cloner::<PassThrough>::sanitizing().copy(value, None) {
        Ok(v) => v,
        Err(never) => match never {},
    }
}

/// Elements carrying prototype-pollution keys anywhere below them are
/// replaced by sanitized copies (sharing one traversal); clean elements are
/// kept by reference.
pub(crate) fn scrub_prototype_keys(values: &[Value]) -> Vec<Value> {
    let mut cloner = Cloner::<PassThrough>::sanitizing();
    values
        .iter()
        .map(|v| {
            if !carries_prototype_keys(v, &mut FxHashSet::default()) {
                return v.clone();
            }
            match cloner.copy(v, None) {
                Ok(v) => v,
                Err(never) => match never {},
            }
        })
        .collect()
}

fn carries_prototype_keys(value: &Value, seen: &mut FxHashSet<usize>) -> bool {
    match value.identity() {
        Some(id) if !seen.insert(id) => return false,
        _ => {}
    }
    match value {
        Value::Object(obj) => obj
            .entries()
            .iter()
            .any(|(key, child)| is_prototype_pollution_key(key) || carries_prototype_keys(child, seen)),
        Value::Array(arr) => arr.to_vec().iter().any(|v| carries_prototype_keys(v, seen)),
        Value::Map(map) => map
            .entries()
            .iter()
            .any(|(k, v)| carries_prototype_keys(k, seen) || carries_prototype_keys(v, seen)),
        Value::Set(set) => set.values().iter().any(|v| carries_prototype_keys(v, seen)),
        _ => false,
    }
}

/// New top-level array or plain object holding the same members.
/// Everything else is returned as-is.
pub fn shallow_clone(value: &Value) -> Value {
    match value {
        Value::Array(a) => Value::array(a.to_vec()),
        Value::Object(o) => Value::Object(ObjectRef::from_entries(o.entries())),
        other => other.clone(),
    }
}

/// What a traversal does with opaque values.
trait OpaquePolicy {
    type Error;

    fn opaque(value: &OpaqueRef) -> Result<Value, Self::Error>;
}

/// Deep clones share opaque values by reference.
struct PassThrough;

impl OpaquePolicy for PassThrough {
    type Error = Infallible;

    fn opaque(value: &OpaqueRef) -> Result<Value, Infallible> {
        Ok(Value::Opaque(value.clone()))
    }
}

/// Structured clones refuse them.
struct Reject;

impl OpaquePolicy for Reject {
    type Error = CloneError;

    fn opaque(value: &OpaqueRef) -> Result<Value, CloneError> {
        Err(CloneError::NotCloneable {
            type_name: value.type_name().to_string(),
        })
    }
}

struct Cloner<P> {
    /// Source identity -> produced copy, scoped to one top-level call.
    visited: FxHashMap<usize, Value>,
    /// Skip prototype-pollution keys in copied objects.
    drop_prototype_keys: bool,
    policy: PhantomData<P>,
}

impl<P: OpaquePolicy> Cloner<P> {
    fn new() -> Self {
        Self {
            visited: FxHashMap::default(),
            drop_prototype_keys: false,
            policy: PhantomData,
        }
    }

    fn sanitizing() -> Self {
        Self {
            drop_prototype_keys: true,
            ..Self::new()
        }
    }

    fn remember(&mut self, source: usize, copy: Value) -> Value {
        self.visited.insert(source, copy.clone());
        copy
    }

    fn copy(&mut self, value: &Value, depth: Option<usize>) -> Result<Value, P::Error> {
        if depth == Some(0) {
            return Ok(value.clone());
        }
        let next = depth.map(|d| d - 1);

        if let Some(id) = value.identity() {
            if let Some(done) = self.visited.get(&id) {
                tracing::trace!(id, "reusing copy of already visited node");
                return Ok(done.clone());
            }
        }

        match value {
            Value::Undefined
            | Value::Null
            | Value::Bool(_)
            | Value::Number(_)
            | Value::String(_) => Ok(value.clone()),

            Value::Opaque(o) => P::opaque(o),

            Value::Object(src) => {
                let out = ObjectRef::new();
                self.remember(src.identity(), Value::Object(out.clone()));
                for (key, child) in src.entries() {
                    if self.drop_prototype_keys && is_prototype_pollution_key(&key) {
                        tracing::debug!(key = %key, "dropping prototype pollution key");
                        continue;
                    }
                    let copied = self.copy(&child, next)?;
                    // Fresh object, never frozen.
                    let _ = out.insert(key, copied);
                }
                Ok(Value::Object(out))
            }

            Value::Array(src) => {
                let out = ArrayRef::new();
                self.remember(src.identity(), Value::Array(out.clone()));
                for child in src.to_vec() {
                    let copied = self.copy(&child, next)?;
                    out.push(copied);
                }
                Ok(Value::Array(out))
            }

            Value::Map(src) => {
                let out = MapRef::new();
                self.remember(src.identity(), Value::Map(out.clone()));
                for (k, v) in src.entries() {
                    let key = self.copy(&k, next)?;
                    let val = self.copy(&v, next)?;
                    out.set(key, val);
                }
                Ok(Value::Map(out))
            }

            Value::Set(src) => {
                let out = SetRef::new();
                self.remember(src.identity(), Value::Set(out.clone()));
                for member in src.values() {
                    let copied = self.copy(&member, next)?;
                    out.add(copied);
                }
                Ok(Value::Set(out))
            }

            Value::Date(src) => {
                Ok(self.remember(src.identity(), Value::Date(DateRef::new(src.get()))))
            }

            Value::RegExp(src) => {
                Ok(self.remember(src.identity(), Value::RegExp(src.duplicate())))
            }

            Value::ArrayBuffer(src) => Ok(self.remember(
                src.identity(),
                Value::ArrayBuffer(BufferRef::from_bytes(src.to_vec())),
            )),
        }
    }
}
