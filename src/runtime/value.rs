use std::{collections::HashMap, fmt, rc::Rc};

use crate::runtime::{
    RuntimeContext,
    callable::{Callable, HostClosure},
    hash_key::HashKey,
};

/// Dynamic value passed through transforms, wrappers, and host callables.
///
/// ## Memory Management Model
///
/// Heap-backed variants (`String`, `Array`, `Hash`, `Callable`) use `Rc` so
/// cloning is O(1) and sequences can be shared between a caller and a result
/// without copying. Primitives stay unboxed.
///
/// The value graph must remain acyclic: `Rc` cannot reclaim cycles, and no
/// operation in this crate mutates a value after construction. Wrapper
/// callables capture values (their target and bound context); captured values
/// must not reference the capturing wrapper.
///
/// Transforms never mutate an input `Array`; they allocate a fresh result
/// vector.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating point number.
    Float(f64),
    /// Boolean value.
    Boolean(bool),
    /// UTF-8 string value.
    String(Rc<str>),
    /// Absence of value.
    None,
    /// Ordered, finite, fully materialized sequence.
    Array(Rc<Vec<Value>>),
    /// Hash map keyed by hashable values.
    Hash(Rc<HashMap<HashKey, Value>>),
    /// Invokable unit: native function, host closure, or wrapper.
    Callable(Rc<Callable>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "\"{}\"", v),
            Value::None => write!(f, "None"),
            Value::Array(elements) => {
                let items: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Value::Hash(pairs) => {
                let mut items: Vec<String> =
                    pairs.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
                // Deterministic rendering; HashMap iteration order is not.
                items.sort();
                write!(f, "{{{}}}", items.join(", "))
            }
            Value::Callable(c) => write!(f, "{}", c),
        }
    }
}

impl Value {
    /// Returns the canonical runtime type label used in diagnostics.
    ///
    /// These labels are user-visible and are expected to remain stable.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Int",
            Value::Float(_) => "Float",
            Value::Boolean(_) => "Bool",
            Value::String(_) => "String",
            Value::None => "None",
            Value::Array(_) => "Array",
            Value::Hash(_) => "Hash",
            Value::Callable(_) => "Callable",
        }
    }

    /// Returns whether this value is truthy.
    ///
    /// Only `Boolean(false)` and `None` are falsy; every other value is
    /// truthy, including `Integer(0)`, `Float(0.0)`, and the empty string.
    /// Predicate transforms (`filter`, `every`, `any`), the memoized inspect
    /// flag, and the memo-cache lookup all decide through this rule.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false) | Value::None)
    }

    /// Converts this value into a hash/cache key if the value is hashable.
    ///
    /// Hashable variants are `Integer`, `Boolean`, and `String`; everything
    /// else returns `None`. Key equality is exact `HashKey` equality — no
    /// normalization across variants.
    pub fn to_hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Integer(v) => Some(HashKey::Integer(*v)),
            Value::Boolean(v) => Some(HashKey::Boolean(*v)),
            Value::String(v) => Some(HashKey::String(v.to_string())),
            _ => None,
        }
    }

    /// Wraps a string slice.
    pub fn string(s: &str) -> Value {
        Value::String(s.into())
    }

    /// Wraps a vector of values as an `Array`.
    pub fn array(elements: Vec<Value>) -> Value {
        Value::Array(Rc::new(elements))
    }

    /// Wraps a callable shape.
    pub fn callable(c: Callable) -> Value {
        Value::Callable(Rc::new(c))
    }

    /// Wraps a Rust closure as a callable value.
    ///
    /// `arity` is the declared parameter count; it is advisory metadata read
    /// by `unary`, never enforced at invocation. The closure receives the
    /// runtime context, the explicit receiver, and the argument vector.
    pub fn host_fn<F>(name: impl Into<Rc<str>>, arity: usize, func: F) -> Value
    where
        F: Fn(&mut dyn RuntimeContext, Option<&Value>, Vec<Value>) -> Result<Value, String>
            + 'static,
    {
        Value::callable(Callable::Closure(HostClosure::new(name, arity, func)))
    }

    /// Returns the declared arity when this value is callable.
    pub fn declared_arity(&self) -> Option<usize> {
        match self {
            Value::Callable(c) => Some(c.declared_arity()),
            _ => None,
        }
    }
}
