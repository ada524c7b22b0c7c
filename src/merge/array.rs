//! Array merge strategies
//!
//! Combines the array already in the result with the array from `next`:
//! - `overwrite` (default): deep copy of `next`, `current` discarded
//! - `append`: `current` then `next`, elements shared (not copied)
//! - `prepend`: `next` then `current`, elements shared (not copied)
//! - custom: a caller-supplied function owns the merge
//!
//! Post-processing runs in order: compact, filter, dedupe.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use knit_value::{Value, ValueKey};

use crate::clone::{deep_clone, deep_clone_all};
use crate::error::MergeError;

/// Custom array merge: `(current, next, clone) -> merged`.
pub type CustomArrayMerge =
    Rc<dyn Fn(&[Value], &[Value], &dyn Fn(&Value) -> Value) -> Result<Vec<Value>, MergeError>>;

/// Array filter predicate: `(item, index, array) -> keep`.
pub type ArrayFilter = Rc<dyn Fn(&Value, usize, &[Value]) -> bool>;

#[derive(Clone, Default)]
pub enum ArrayBehavior {
    #[default]
    Overwrite,
    Append,
    Prepend,
    Custom(CustomArrayMerge),
}

impl ArrayBehavior {
    pub fn custom(
        merge: impl Fn(&[Value], &[Value], &dyn Fn(&Value) -> Value) -> Result<Vec<Value>, MergeError>
            + 'static,
    ) -> Self {
        ArrayBehavior::Custom(Rc::new(merge))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ArrayBehavior::Overwrite => "overwrite",
            ArrayBehavior::Append => "append",
            ArrayBehavior::Prepend => "prepend",
            ArrayBehavior::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for ArrayBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArrayBehavior {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overwrite" => Ok(ArrayBehavior::Overwrite),
            "append" => Ok(ArrayBehavior::Append),
            "prepend" => Ok(ArrayBehavior::Prepend),
            other => Err(MergeError::UnknownArrayBehavior(other.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for ArrayBehavior {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Which elements compaction removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compact {
    /// `null` and `undefined`.
    Nullish,
    /// Every falsy value (`false`, `0`, `NaN`, `""`, `null`, `undefined`).
    Falsy,
}

impl Compact {
    pub fn keeps(self, value: &Value) -> bool {
        match self {
            Compact::Nullish => !value.is_nullish(),
            Compact::Falsy => value.is_truthy(),
        }
    }
}

/// Options for array-valued keys.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArrayMergeOptions {
    pub behavior: ArrayBehavior,

    /// Drop later duplicates under SameValueZero (identity for composites).
    pub dedupe: bool,

    #[serde(skip)]
    pub filter: Option<ArrayFilter>,

    pub compact: Option<Compact>,
}

impl fmt::Debug for ArrayMergeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayMergeOptions")
            .field("behavior", &self.behavior)
            .field("dedupe", &self.dedupe)
            .field("filter", &self.filter.as_ref().map(|_| ".."))
            .field("compact", &self.compact)
            .finish()
    }
}

impl ArrayMergeOptions {
    pub fn new(behavior: ArrayBehavior) -> Self {
        Self {
            behavior,
            ..Self::default()
        }
    }

    pub fn with_dedupe(mut self) -> Self {
        self.dedupe = true;
        self
    }

    pub fn with_compact(mut self, compact: Compact) -> Self {
        self.compact = Some(compact);
        self
    }

    pub fn with_filter(mut self, filter: impl Fn(&Value, usize, &[Value]) -> bool + 'static) -> Self {
        self.filter = Some(Rc::new(filter));
        self
    }
}

/// Merge two arrays according to `opts`.
pub fn merge_arrays(
    current: &[Value],
    next: &[Value],
    opts: &ArrayMergeOptions,
) -> Result<Vec<Value>, MergeError> {
    let mut merged: Vec<Value> = match &opts.behavior {
        ArrayBehavior::Overwrite => deep_clone_all(next),
        ArrayBehavior::Append => current.iter().chain(next).cloned().collect(),
        ArrayBehavior::Prepend => next.iter().chain(current).cloned().collect(),
        ArrayBehavior::Custom(merge) => merge(current, next, &deep_clone)?,
    };

    if let Some(compact) = opts.compact {
        merged.retain(|v| compact.keeps(v));
    }

    if let Some(filter) = &opts.filter {
        merged = merged
            .iter()
            .enumerate()
            .filter(|(i, v)| filter(v, *i, &merged))
            .map(|(_, v)| v.clone())
            .collect();
    }

    if opts.dedupe {
        let mut seen = FxHashSet::default();
        merged.retain(|v| seen.insert(ValueKey::of(v)));
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn nums(ns: &[i32]) -> Vec<Value> {
        ns.iter().map(|n| Value::from(*n)).collect()
    }

    #[test]
    fn test_append() {
        let out = merge_arrays(&nums(&[1, 2]), &nums(&[2, 3]), &ArrayMergeOptions::new(ArrayBehavior::Append))
            .unwrap();
        assert_eq!(out, nums(&[1, 2, 2, 3]));
    }

    #[test]
    fn test_append_dedupe() {
        let opts = ArrayMergeOptions::new(ArrayBehavior::Append).with_dedupe();
        let out = merge_arrays(&nums(&[1, 2]), &nums(&[2, 3]), &opts).unwrap();
        assert_eq!(out, nums(&[1, 2, 3]));
    }

    #[test]
    fn test_prepend() {
        let out = merge_arrays(&nums(&[1]), &nums(&[2, 3]), &ArrayMergeOptions::new(ArrayBehavior::Prepend))
            .unwrap();
        assert_eq!(out, nums(&[2, 3, 1]));
    }

    #[test]
    fn test_overwrite_deep_clones_next() {
        let next = vec![Value::from(json!({"b": 2}))];
        let out = merge_arrays(&[Value::from(json!({"a": 1}))], &next, &ArrayMergeOptions::default())
            .unwrap();
        assert_eq!(out, next);
        assert!(!out[0].ptr_eq(&next[0]));
        out[0].as_object().unwrap().insert("b", Value::from(99)).unwrap();
        assert_eq!(next[0].get("b"), Some(Value::from(2)));
    }

    // Append and prepend share elements with their inputs. Callers rely on
    // this; change it deliberately or not at all.
    #[test]
    fn test_append_shares_elements() {
        let curr = vec![Value::from(json!({"a": 1}))];
        let next = vec![Value::from(json!({"b": 2}))];
        let out = merge_arrays(&curr, &next, &ArrayMergeOptions::new(ArrayBehavior::Append)).unwrap();
        assert!(out[0].ptr_eq(&curr[0]));
        assert!(out[1].ptr_eq(&next[0]));

        let out = merge_arrays(&curr, &next, &ArrayMergeOptions::new(ArrayBehavior::Prepend)).unwrap();
        assert!(out[0].ptr_eq(&next[0]));
    }

    #[test]
    fn test_dedupe_keeps_distinct_equal_objects() {
        let shared = Value::from(json!({"k": 1}));
        let twin = Value::from(json!({"k": 1}));
        let opts = ArrayMergeOptions::new(ArrayBehavior::Append).with_dedupe();
        let out = merge_arrays(&[shared.clone(), twin], &[shared], &opts).unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_filter_then_dedupe() {
        let opts = ArrayMergeOptions::new(ArrayBehavior::Append)
            .with_filter(|v, _, _| v.as_f64().map_or(false, |n| n > 1.0))
            .with_dedupe();
        let out = merge_arrays(&nums(&[1, 2, 3]), &nums(&[3, 4, 1]), &opts).unwrap();
        assert_eq!(out, nums(&[2, 3, 4]));
    }

    #[test]
    fn test_filter_sees_index_and_array() {
        let opts = ArrayMergeOptions::new(ArrayBehavior::Append)
            .with_filter(|_, i, all| i + 1 < all.len());
        let out = merge_arrays(&nums(&[1, 2]), &nums(&[3]), &opts).unwrap();
        assert_eq!(out, nums(&[1, 2]));
    }

    #[test]
    fn test_compact() {
        let curr = vec![Value::Null, Value::from(0), Value::from("")];
        let next = vec![Value::Undefined, Value::from(false), Value::from("x")];
        let append = ArrayMergeOptions::new(ArrayBehavior::Append);

        let nullish = merge_arrays(&curr, &next, &append.clone().with_compact(Compact::Nullish)).unwrap();
        assert_eq!(nullish, vec![Value::from(0), Value::from(""), Value::from(false), Value::from("x")]);

        let falsy = merge_arrays(&curr, &next, &append.with_compact(Compact::Falsy)).unwrap();
        assert_eq!(falsy, vec![Value::from("x")]);
    }

    #[test]
    fn test_custom_behavior() {
        let opts = ArrayMergeOptions::new(ArrayBehavior::custom(|curr, next, clone| {
            Ok(next.iter().map(clone).chain(curr.iter().cloned()).rev().collect())
        }));
        let out = merge_arrays(&nums(&[1]), &nums(&[2, 3]), &opts).unwrap();
        assert_eq!(out, nums(&[1, 3, 2]));
    }

    #[test]
    fn test_custom_behavior_error_propagates() {
        let opts = ArrayMergeOptions::new(ArrayBehavior::custom(|_, _, _| {
            Err(MergeError::Custom("refused".to_string()))
        }));
        let err = merge_arrays(&[], &[], &opts).unwrap_err();
        assert_eq!(err, MergeError::Custom("refused".to_string()));
    }

    #[test]
    fn test_behavior_from_str() {
        assert!(matches!("append".parse::<ArrayBehavior>(), Ok(ArrayBehavior::Append)));
        assert_eq!(
            "concat".parse::<ArrayBehavior>().unwrap_err(),
            MergeError::UnknownArrayBehavior("concat".to_string())
        );
    }

    #[test]
    fn test_options_from_config() {
        let opts: ArrayMergeOptions =
            serde_json::from_value(json!({"behavior": "prepend", "dedupe": true, "compact": "nullish"}))
                .unwrap();
        assert_eq!(opts.behavior.name(), "prepend");
        assert!(opts.dedupe);
        assert_eq!(opts.compact, Some(Compact::Nullish));

        let err = serde_json::from_value::<ArrayMergeOptions>(json!({"behavior": "zip"})).unwrap_err();
        assert!(err.to_string().contains("unknown array merge behavior"));
    }
}
