//! The `Value` union.

use std::cell::RefCell;
use std::fmt;

use crate::{
    ArrayRef, BufferRef, DateRef, MapRef, ObjectRef, OpaqueRef, RegExpRef, SetRef, ValueKey,
};

/// A node in a value graph.
///
/// Primitive variants are plain data. Composite variants are shared handles:
/// `Value::clone` aliases the same underlying node, it does not copy it.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Object(ObjectRef),
    Array(ArrayRef),
    Map(MapRef),
    Set(SetRef),
    Date(DateRef),
    RegExp(RegExpRef),
    ArrayBuffer(BufferRef),
    Opaque(OpaqueRef),
}

impl Value {
    /// A new empty plain object.
    pub fn object() -> Self {
        Value::Object(ObjectRef::new())
    }

    /// A new array holding `items`.
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(ArrayRef::from_vec(items))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// JavaScript truthiness.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Property lookup on a plain object; `None` for anything else.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.as_object().and_then(|o| o.get(key))
    }

    /// Pointer identity of a composite (or opaque) value; `None` for primitives.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Object(o) => Some(o.identity()),
            Value::Array(a) => Some(a.identity()),
            Value::Map(m) => Some(m.identity()),
            Value::Set(s) => Some(s.identity()),
            Value::Date(d) => Some(d.identity()),
            Value::RegExp(r) => Some(r.identity()),
            Value::ArrayBuffer(b) => Some(b.identity()),
            Value::Opaque(o) => Some(o.identity()),
            _ => None,
        }
    }

    /// True when both values are the same composite node (`===` on objects).
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self.identity(), other.identity()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// SameValueZero: primitives by value, composites by identity.
    pub fn same_value_zero(&self, other: &Value) -> bool {
        ValueKey::of(self) == ValueKey::of(other)
    }

    /// `Object.isFrozen`: primitives are always frozen, only plain objects
    /// can become frozen.
    pub fn is_frozen(&self) -> bool {
        match self {
            Value::Object(o) => o.is_frozen(),
            Value::Undefined
            | Value::Null
            | Value::Bool(_)
            | Value::Number(_)
            | Value::String(_) => true,
            _ => false,
        }
    }

    /// Cycle-safe structural equality.
    ///
    /// Object keys compare as sets, Map and Set entries compare in order.
    /// Opaque values compare by identity.
    pub fn deep_eq(&self, other: &Value) -> bool {
        let mut assumed = Vec::new();
        deep_eq_inner(self, other, &mut assumed)
    }
}

fn deep_eq_inner(a: &Value, b: &Value, assumed: &mut Vec<(usize, usize)>) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y || (x.is_nan() && y.is_nan()),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Opaque(x), Value::Opaque(y)) => x.ptr_eq(y),
        (Value::Date(x), Value::Date(y)) => x.get() == y.get(),
        (Value::RegExp(x), Value::RegExp(y)) => x.source() == y.source() && x.flags() == y.flags(),
        (Value::ArrayBuffer(x), Value::ArrayBuffer(y)) => x.to_vec() == y.to_vec(),
        _ => {
            let (Some(ia), Some(ib)) = (a.identity(), b.identity()) else {
                return false;
            };
            if ia == ib || assumed.contains(&(ia, ib)) {
                return true;
            }
            assumed.push((ia, ib));
            match (a, b) {
                (Value::Object(x), Value::Object(y)) => {
                    let xs = x.entries();
                    xs.len() == y.len()
                        && xs.iter().all(|(k, v)| match y.get(k) {
                            Some(w) => deep_eq_inner(v, &w, assumed),
                            None => false,
                        })
                }
                (Value::Array(x), Value::Array(y)) => {
                    let (xs, ys) = (x.to_vec(), y.to_vec());
                    xs.len() == ys.len()
                        && xs.iter().zip(&ys).all(|(v, w)| deep_eq_inner(v, w, assumed))
                }
                (Value::Map(x), Value::Map(y)) => {
                    let (xs, ys) = (x.entries(), y.entries());
                    xs.len() == ys.len()
                        && xs.iter().zip(&ys).all(|((k1, v1), (k2, v2))| {
                            deep_eq_inner(k1, k2, assumed) && deep_eq_inner(v1, v2, assumed)
                        })
                }
                (Value::Set(x), Value::Set(y)) => {
                    let (xs, ys) = (x.values(), y.values());
                    xs.len() == ys.len()
                        && xs.iter().zip(&ys).all(|(v, w)| deep_eq_inner(v, w, assumed))
                }
                _ => false,
            }
        }
    }
}

/// Structural equality, see [`Value::deep_eq`]. Use [`Value::ptr_eq`] for identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.deep_eq(other)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}

impl From<ArrayRef> for Value {
    fn from(a: ArrayRef) -> Self {
        Value::Array(a)
    }
}

impl From<MapRef> for Value {
    fn from(m: MapRef) -> Self {
        Value::Map(m)
    }
}

impl From<SetRef> for Value {
    fn from(s: SetRef) -> Self {
        Value::Set(s)
    }
}

impl From<DateRef> for Value {
    fn from(d: DateRef) -> Self {
        Value::Date(d)
    }
}

impl From<RegExpRef> for Value {
    fn from(r: RegExpRef) -> Self {
        Value::RegExp(r)
    }
}

impl From<BufferRef> for Value {
    fn from(b: BufferRef) -> Self {
        Value::ArrayBuffer(b)
    }
}

impl From<OpaqueRef> for Value {
    fn from(o: OpaqueRef) -> Self {
        Value::Opaque(o)
    }
}

/// Debug view that prints `[Circular]` instead of re-entering a node that is
/// already on the current path.
struct Shown<'a> {
    value: &'a Value,
    path: &'a RefCell<Vec<usize>>,
}

impl<'a> Shown<'a> {
    fn child<'b>(&'b self, value: &'b Value) -> Shown<'b> {
        Shown {
            value,
            path: self.path,
        }
    }
}

impl fmt::Debug for Shown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = match self.value {
            Value::Object(_) | Value::Array(_) | Value::Map(_) | Value::Set(_) => {
                self.value.identity()
            }
            _ => None,
        };
        if let Some(id) = id {
            if self.path.borrow().contains(&id) {
                return f.write_str("[Circular]");
            }
            self.path.borrow_mut().push(id);
        }
        let result = match self.value {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Object(o) => {
                let entries = o.entries();
                let mut map = f.debug_map();
                for (k, v) in &entries {
                    map.entry(k, &self.child(v));
                }
                map.finish()
            }
            Value::Array(a) => {
                let items = a.to_vec();
                f.debug_list()
                    .entries(items.iter().map(|v| self.child(v)))
                    .finish()
            }
            Value::Map(m) => {
                let entries = m.entries();
                f.write_str("Map ")?;
                let mut map = f.debug_map();
                for (k, v) in &entries {
                    map.entry(&self.child(k), &self.child(v));
                }
                map.finish()
            }
            Value::Set(s) => {
                let values = s.values();
                f.write_str("Set ")?;
                f.debug_set()
                    .entries(values.iter().map(|v| self.child(v)))
                    .finish()
            }
            Value::Date(d) => write!(f, "Date({})", d.get().to_rfc3339()),
            Value::RegExp(r) => write!(f, "/{}/{}", r.source(), r.flags()),
            Value::ArrayBuffer(b) => write!(f, "{:?}", b),
            Value::Opaque(o) => write!(f, "{:?}", o),
        };
        if id.is_some() {
            self.path.borrow_mut().pop();
        }
        result
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = RefCell::new(Vec::new());
        fmt::Debug::fmt(&Shown { value: self, path: &path }, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(Value::from("0").is_truthy());
        assert!(Value::object().is_truthy());
    }

    #[test]
    fn test_deep_eq_structural_not_identity() {
        let a = Value::from(ObjectRef::from_entries([("x", Value::from(1))]));
        let b = Value::from(ObjectRef::from_entries([("x", Value::from(1))]));
        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
        assert!(a.ptr_eq(&a.clone()));
    }

    #[test]
    fn test_deep_eq_cyclic() {
        let a = ObjectRef::new();
        a.insert("self", Value::from(a.clone())).unwrap();
        let b = ObjectRef::new();
        b.insert("self", Value::from(b.clone())).unwrap();
        assert!(Value::from(a).deep_eq(&Value::from(b)));
    }

    #[test]
    fn test_debug_marks_cycles() {
        let a = ObjectRef::new();
        a.insert("self", Value::from(a.clone())).unwrap();
        assert_eq!(format!("{:?}", Value::from(a)), r#"{"self": [Circular]}"#);
    }

    #[test]
    fn test_debug_repeated_reference_is_not_circular() {
        let shared = Value::array(vec![Value::from(1)]);
        let root = Value::array(vec![shared.clone(), shared]);
        assert_eq!(format!("{:?}", root), "[[1], [1]]");
    }

    #[test]
    fn test_primitives_are_frozen() {
        assert!(Value::from(1).is_frozen());
        assert!(!Value::object().is_frozen());
        assert!(!Value::array(vec![]).is_frozen());
    }
}
