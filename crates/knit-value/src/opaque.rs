//! Opaque values: functions and class instances.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::Value;

/// What an opaque value stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpaqueKind {
    Function,
    Instance,
}

type Callable = Box<dyn Fn(&[Value]) -> Value>;

struct OpaqueData {
    kind: OpaqueKind,
    type_name: String,
    inner: Option<Box<dyn Any>>,
    call: Option<Callable>,
}

/// Shared handle to a value the engine never looks inside.
///
/// Opaque values are copied by reference everywhere and cannot be
/// structured-cloned.
#[derive(Clone)]
pub struct OpaqueRef(Rc<OpaqueData>);

impl OpaqueRef {
    pub fn function(name: impl Into<String>, call: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Self(Rc::new(OpaqueData {
            kind: OpaqueKind::Function,
            type_name: name.into(),
            inner: None,
            call: Some(Box::new(call)),
        }))
    }

    /// Wrap an instance of some class-like type.
    pub fn instance<T: Any>(type_name: impl Into<String>, value: T) -> Self {
        Self(Rc::new(OpaqueData {
            kind: OpaqueKind::Instance,
            type_name: type_name.into(),
            inner: Some(Box::new(value)),
            call: None,
        }))
    }

    pub fn kind(&self) -> OpaqueKind {
        self.0.kind
    }

    pub fn type_name(&self) -> &str {
        &self.0.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.inner.as_ref().and_then(|b| b.downcast_ref::<T>())
    }

    /// Invoke a function opaque. `None` for instances.
    pub fn call(&self, args: &[Value]) -> Option<Value> {
        self.0.call.as_ref().map(|f| f(args))
    }

    pub fn ptr_eq(&self, other: &OpaqueRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for OpaqueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.kind {
            OpaqueKind::Function => write!(f, "[Function: {}]", self.0.type_name),
            OpaqueKind::Instance => write!(f, "{} {{}}", self.0.type_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Point(i32, i32);

    #[test]
    fn test_function_call() {
        let f = OpaqueRef::function("double", |args| match args.first() {
            Some(Value::Number(n)) => Value::Number(n * 2.0),
            _ => Value::Undefined,
        });
        assert_eq!(f.kind(), OpaqueKind::Function);
        assert_eq!(f.call(&[Value::from(21)]), Some(Value::from(42)));
    }

    #[test]
    fn test_instance_downcast() {
        let p = OpaqueRef::instance("Point", Point(1, 2));
        assert_eq!(p.downcast_ref::<Point>(), Some(&Point(1, 2)));
        assert!(p.call(&[]).is_none());
        assert_eq!(format!("{:?}", p), "Point {}");
    }
}
