//! Nullish stripping.

use rustc_hash::FxHashMap;

use knit_value::{ArrayRef, ObjectRef, Value};

/// Copy of `value` without `null`/`undefined` object members.
///
/// Recurses into plain objects and array elements. Nullish array elements
/// are dropped only when `compact_arrays` is set. Inputs are not mutated;
/// cycles map onto the stripped copy.
pub fn strip_nullish(value: &Value, compact_arrays: bool) -> Value {
    Stripper {
        compact_arrays,
        done: FxHashMap::default(),
    }
    .strip(value)
}

struct Stripper {
    compact_arrays: bool,
    done: FxHashMap<usize, Value>,
}

impl Stripper {
    fn strip(&mut self, value: &Value) -> Value {
        match value {
            Value::Object(src) => {
                if let Some(copy) = self.done.get(&src.identity()) {
                    return copy.clone();
                }
                let out = ObjectRef::new();
                self.done.insert(src.identity(), Value::Object(out.clone()));
                for (key, child) in src.entries() {
                    if child.is_nullish() {
                        continue;
                    }
                    let stripped = self.strip(&child);
                    // Fresh object, never frozen.
                    let _ = out.insert(key, stripped);
                }
                Value::Object(out)
            }
            Value::Array(src) => {
                if let Some(copy) = self.done.get(&src.identity()) {
                    return copy.clone();
                }
                let out = ArrayRef::new();
                self.done.insert(src.identity(), Value::Array(out.clone()));
                for child in src.to_vec() {
                    if self.compact_arrays && child.is_nullish() {
                        continue;
                    }
                    out.push(self.strip(&child));
                }
                Value::Array(out)
            }
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_strips_nested_nullish() {
        let src = Value::from(json!({"a": null, "b": {"c": null, "d": 1}, "e": [null, {"f": null}]}));
        let out = strip_nullish(&src, false);
        let list = src.get("e").unwrap();
        assert_eq!(out, Value::from(json!({"b": {"d": 1}, "e": [null, {}]})));
        assert!(!out.get("e").unwrap().ptr_eq(&list));
        // input untouched
        assert!(src.get("a").is_some());
    }

    #[test]
    fn test_compacts_arrays_when_requested() {
        let src = Value::from(json!({"e": [null, {"f": null, "g": 2}, 0]}));
        let out = strip_nullish(&src, true);
        assert_eq!(out, Value::from(json!({"e": [{"g": 2}, 0]})));
    }

    #[test]
    fn test_undefined_members_removed() {
        let obj = ObjectRef::from_entries([("u", Value::Undefined), ("k", Value::from("v"))]);
        let out = strip_nullish(&Value::Object(obj), false);
        assert_eq!(out.as_object().unwrap().keys(), vec!["k".to_string()]);
    }

    #[test]
    fn test_array_cycle() {
        let list = ArrayRef::new();
        list.push(Value::Null);
        list.push(Value::Array(list.clone()));
        let out = strip_nullish(&Value::Array(list), true);
        let items = out.as_array().unwrap().to_vec();
        assert_eq!(items.len(), 1);
        assert!(items[0].ptr_eq(&out));
    }

    #[test]
    fn test_cycle() {
        let a = ObjectRef::new();
        a.insert("gone", Value::Null).unwrap();
        a.insert("self", Value::Object(a.clone())).unwrap();
        let out = strip_nullish(&Value::Object(a), false);
        assert!(out.get("self").unwrap().ptr_eq(&out));
        assert!(out.get("gone").is_none());
    }
}
