//! Hashable SameValueZero keys.

use crate::Value;

/// Hashable form of a value under SameValueZero equality.
///
/// Primitives compare by value (NaN equals NaN, `+0` equals `-0`), composites
/// by identity. Used for Map keys, Set members and array dedupe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Undefined,
    Null,
    Bool(bool),
    Number(u64),
    String(String),
    Ref(usize),
}

impl ValueKey {
    /// Compute the key for a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Undefined => ValueKey::Undefined,
            Value::Null => ValueKey::Null,
            Value::Bool(b) => ValueKey::Bool(*b),
            Value::Number(n) => ValueKey::Number(number_bits(*n)),
            Value::String(s) => ValueKey::String(s.clone()),
            other => match other.identity() {
                Some(id) => ValueKey::Ref(id),
                None => ValueKey::Undefined,
            },
        }
    }
}

fn number_bits(n: f64) -> u64 {
    if n.is_nan() {
        f64::NAN.to_bits()
    } else if n == 0.0 {
        0.0f64.to_bits()
    } else {
        n.to_bits()
    }
}
