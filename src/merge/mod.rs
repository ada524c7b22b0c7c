//! Recursive merge
//!
//! Combines `current` with `next` into a new value tree:
//! - Plain objects: merged key by key, recursively
//! - Arrays: delegated to [`merge_arrays`]
//! - Everything else: `next` wins, or the primitive handler decides
//!
//! Keys that could pollute a prototype chain are never copied, and an
//! `undefined` member of `next` is a no-op. If either side is not a plain
//! object the merge is skipped and `current` comes back unchanged.

mod array;
mod strip;

pub use array::{merge_arrays, ArrayBehavior, ArrayFilter, ArrayMergeOptions, Compact, CustomArrayMerge};
pub use strip::strip_nullish;

use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::fmt;
use std::rc::Rc;

use knit_value::{classify, is_prototype_pollution_key, Value};

use crate::clone::{clone, sanitized_clone, scrub_prototype_keys, CloneOptions, CloneStrategy};
use crate::error::MergeError;

/// Decides the value for a non-object key: `(slot in result, value from next) -> value`.
/// The slot is `undefined` when the result does not have the key yet.
pub type PrimitiveHandler = Rc<dyn Fn(&Value, &Value) -> Value>;

/// Options for [`merge`].
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    pub array: ArrayMergeOptions,

    #[serde(skip)]
    pub primitive_handler: Option<PrimitiveHandler>,

    /// An empty object in `next` replaces whatever `current` held there.
    pub retain_empty_object_props: bool,

    /// Remove `null`/`undefined` members from the result.
    pub strip_nullish: bool,

    /// Strategy used to copy `current` before merging into it.
    pub clone_strategy: CloneStrategy,

    /// Levels of nested objects merged key by key. Past it, a nested object
    /// from `next` replaces the slot with a deep copy. `None` is unbounded.
    pub max_depth: Option<usize>,
}

impl fmt::Debug for MergeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeOptions")
            .field("array", &self.array)
            .field("primitive_handler", &self.primitive_handler.as_ref().map(|_| ".."))
            .field("retain_empty_object_props", &self.retain_empty_object_props)
            .field("strip_nullish", &self.strip_nullish)
            .field("clone_strategy", &self.clone_strategy)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl MergeOptions {
    pub fn with_array(mut self, array: ArrayMergeOptions) -> Self {
        self.array = array;
        self
    }

    pub fn with_array_behavior(mut self, behavior: ArrayBehavior) -> Self {
        self.array.behavior = behavior;
        self
    }

    pub fn with_primitive_handler(mut self, handler: impl Fn(&Value, &Value) -> Value + 'static) -> Self {
        self.primitive_handler = Some(Rc::new(handler));
        self
    }

    pub fn with_retain_empty_object_props(mut self) -> Self {
        self.retain_empty_object_props = true;
        self
    }

    pub fn with_strip_nullish(mut self) -> Self {
        self.strip_nullish = true;
        self
    }

    pub fn with_clone_strategy(mut self, strategy: CloneStrategy) -> Self {
        self.clone_strategy = strategy;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// Merge `next` into a copy of `current`.
///
/// Neither input is modified. Keys only in `next` are deep copies, never
/// aliases, and no object taken from `next` keeps a prototype-pollution
/// key at any depth. Non-plain, non-array values from `next` (dates,
/// regexps, maps, sets, opaque values) are stored by reference, so the
/// result shares them with `next`.
pub fn merge(current: &Value, next: &Value, opts: &MergeOptions) -> Result<Value, MergeError> {
    let mut merger = Merger {
        opts,
        in_progress: FxHashMap::default(),
    };
    let merged = merger.merge_level(current, next, opts.max_depth)?;
    if opts.strip_nullish && !merged.ptr_eq(current) {
        return Ok(strip_nullish(&merged, opts.array.compact.is_some()));
    }
    Ok(merged)
}

struct Merger<'a> {
    opts: &'a MergeOptions,
    /// (current, next) identities -> result object, scoped to one call.
    in_progress: FxHashMap<(usize, usize), Value>,
}

impl Merger<'_> {
    fn merge_level(
        &mut self,
        current: &Value,
        next: &Value,
        depth: Option<usize>,
    ) -> Result<Value, MergeError> {
        let (Value::Object(current_obj), Value::Object(next_obj)) = (current, next) else {
            tracing::debug!(
                current = %classify(current),
                next = %classify(next),
                "merge skipped: both sides must be plain objects"
            );
            return Ok(current.clone());
        };

        let pair = (current_obj.identity(), next_obj.identity());
        if let Some(done) = self.in_progress.get(&pair) {
            tracing::trace!("reusing result of a pair already being merged");
            return Ok(done.clone());
        }

        let base = clone(
            current,
            &CloneOptions {
                strategy: self.opts.clone_strategy,
                max_depth: None,
            },
        )?;
        let Value::Object(result) = &base else {
            return Err(MergeError::NotAnObject(classify(&base)));
        };
        self.in_progress.insert(pair, base.clone());

        for (key, value) in next_obj.entries() {
            if is_prototype_pollution_key(&key) {
                tracing::debug!(key = %key, "dropping prototype pollution key");
                continue;
            }

            let slot = result.get(&key);
            let merged = match &value {
                Value::Undefined => continue,

                Value::Array(next_items) => match &slot {
                    Some(Value::Array(current_items)) => Value::array(merge_arrays(
                        &current_items.to_vec(),
                        &scrub_prototype_keys(&next_items.to_vec()),
                        &self.opts.array,
                    )?),
                    _ => sanitized_clone(&value),
                },

                Value::Object(obj) if obj.is_empty() && self.opts.retain_empty_object_props => {
                    Value::object()
                }

                // Recurse on the source member so a cycle in `current` maps
                // back onto a pair already in progress.
                Value::Object(_) => match current_obj.get(&key) {
                    Some(existing) if depth != Some(0) => {
                        self.merge_level(&existing, &value, depth.map(|d| d - 1))?
                    }
                    _ => sanitized_clone(&value),
                },

                _ => match &self.opts.primitive_handler {
                    Some(handler) => handler(&slot.unwrap_or_default(), &value),
                    None => value.clone(),
                },
            };
            result.insert(key, merged)?;
        }

        Ok(base)
    }
}
