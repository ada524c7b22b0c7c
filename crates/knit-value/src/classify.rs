//! Value classification.
//!
//! Every value falls into exactly one [`Kind`]. Functions and class
//! instances are opaque and classify as [`Kind::Primitive`], so the engine
//! passes them through without traversing them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Value;

/// Classification of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Primitive,
    #[serde(rename = "plainObject")]
    PlainObject,
    Array,
    Map,
    Set,
    Date,
    RegExp,
    ArrayBuffer,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Primitive => "primitive",
            Kind::PlainObject => "plainObject",
            Kind::Array => "array",
            Kind::Map => "map",
            Kind::Set => "set",
            Kind::Date => "date",
            Kind::RegExp => "regexp",
            Kind::ArrayBuffer => "arraybuffer",
        }
    }

    /// Whether values of this kind are copied node-by-node by a deep clone.
    pub fn is_composite(self) -> bool {
        !matches!(self, Kind::Primitive)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a value. Total; never fails.
pub fn classify(value: &Value) -> Kind {
    match value {
        Value::Undefined
        | Value::Null
        | Value::Bool(_)
        | Value::Number(_)
        | Value::String(_)
        | Value::Opaque(_) => Kind::Primitive,
        Value::Object(_) => Kind::PlainObject,
        Value::Array(_) => Kind::Array,
        Value::Map(_) => Kind::Map,
        Value::Set(_) => Kind::Set,
        Value::Date(_) => Kind::Date,
        Value::RegExp(_) => Kind::RegExp,
        Value::ArrayBuffer(_) => Kind::ArrayBuffer,
    }
}

pub fn is_plain_object(value: &Value) -> bool {
    classify(value) == Kind::PlainObject
}
