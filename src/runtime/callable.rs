use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    fmt,
    rc::Rc,
};

use crate::runtime::{NativeFn, RuntimeContext, hash_key::HashKey, stats, value::Value};

/// Host-registered function with a fixed declared arity.
///
/// Declared arity is advisory metadata: it is read by `unary` to decide
/// whether adaptation is needed, never enforced at invocation. Natives
/// validate their own arguments.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: NativeFn,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({}/{})", self.name, self.arity)
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Boxed host closure signature shared by [`HostClosure`] and
/// [`Value::host_fn`].
pub type HostFn =
    dyn Fn(&mut dyn RuntimeContext, Option<&Value>, Vec<Value>) -> Result<Value, String>;

/// A Rust closure passed in by the embedder.
///
/// Unlike [`NativeFunction`] this may capture state. Equality is identity of
/// the underlying closure allocation, so a cloned value compares equal to its
/// original while two separately constructed closures never do.
#[derive(Clone)]
pub struct HostClosure {
    pub name: Rc<str>,
    pub arity: usize,
    pub func: Rc<HostFn>,
}

impl HostClosure {
    pub fn new<F>(name: impl Into<Rc<str>>, arity: usize, func: F) -> Self
    where
        F: Fn(&mut dyn RuntimeContext, Option<&Value>, Vec<Value>) -> Result<Value, String>
            + 'static,
    {
        stats::record_host_closure();
        Self {
            name: name.into(),
            arity,
            func: Rc::new(func),
        }
    }
}

impl fmt::Debug for HostClosure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostClosure({}/{})", self.name, self.arity)
    }
}

impl PartialEq for HostClosure {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

/// First-argument adapter produced by `unary`.
///
/// Forwards only the first invocation argument to the target, so call sites
/// that pass extra arguments cannot leak them into the target. Declared
/// arity is always 1.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryAdapter {
    pub target: Value,
    pub context: Option<Value>,
}

impl UnaryAdapter {
    pub fn new(target: Value, context: Option<Value>) -> Self {
        stats::record_unary_adapter();
        Self { target, context }
    }
}

/// Single-fire guard produced by `once`.
///
/// Two states: Armed, then Fired after the first invocation. Fired is
/// terminal; there is no reset. The latch trips before the target runs, so a
/// failing first call still consumes the single firing.
#[derive(Debug)]
pub struct OnceGuard {
    pub target: Value,
    pub context: Option<Value>,
    fired: Cell<bool>,
}

impl OnceGuard {
    pub fn new(target: Value, context: Option<Value>) -> Self {
        stats::record_once_guard();
        Self {
            target,
            context,
            fired: Cell::new(false),
        }
    }

    /// Whether the guard has left the Armed state.
    pub fn has_fired(&self) -> bool {
        self.fired.get()
    }

    /// Trips the latch. Returns true when this call moved Armed to Fired,
    /// false when the guard had already fired.
    pub(crate) fn trip(&self) -> bool {
        !self.fired.replace(true)
    }
}

/// Keyed result cache produced by `memoize`.
///
/// One cache per wrapper, owned for the wrapper's lifetime, never evicted.
/// Unbounded growth is a documented property, not an oversight.
#[derive(Debug)]
pub struct MemoCache {
    pub target: Value,
    pub context: Option<Value>,
    cache: RefCell<HashMap<HashKey, Value>>,
}

impl MemoCache {
    pub fn new(target: Value, context: Option<Value>) -> Self {
        stats::record_memo_cache();
        Self {
            target,
            context,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Truthiness-gated lookup: a stored falsy value (`false` or `None`) is
    /// treated as absent, so the target runs again for that key on every
    /// call. This preserves the original library's cache-hit rule.
    pub fn lookup(&self, key: &HashKey) -> Option<Value> {
        self.cache
            .borrow()
            .get(key)
            .filter(|v| v.is_truthy())
            .cloned()
    }

    /// Stores a computed result. Overwrites an earlier falsy entry.
    pub fn store(&self, key: HashKey, value: Value) {
        if self.cache.borrow_mut().insert(key, value).is_none() {
            stats::record_memo_entry();
        }
    }

    /// Copy of the full cache contents, falsy entries included.
    pub fn snapshot(&self) -> HashMap<HashKey, Value> {
        self.cache.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }
}

/// The invokable shapes a [`Value::Callable`] can carry.
#[derive(Debug)]
pub enum Callable {
    Native(NativeFunction),
    Closure(HostClosure),
    Unary(UnaryAdapter),
    Once(OnceGuard),
    Memo(MemoCache),
}

impl Callable {
    /// Debug/display name of the underlying unit of behavior.
    pub fn name(&self) -> &str {
        match self {
            Callable::Native(n) => n.name,
            Callable::Closure(c) => &c.name,
            Callable::Unary(a) => a.target.callable_name(),
            Callable::Once(g) => g.target.callable_name(),
            Callable::Memo(m) => m.target.callable_name(),
        }
    }

    /// Declared parameter count.
    ///
    /// Adapters declare 1 (they forward a single argument), the memoized
    /// wrapper declares 1 (the cache key), and the once-guard forwards
    /// everything, so it reports its target's arity.
    pub fn declared_arity(&self) -> usize {
        match self {
            Callable::Native(n) => n.arity,
            Callable::Closure(c) => c.arity,
            Callable::Unary(_) => 1,
            Callable::Once(g) => g.target.declared_arity().unwrap_or(0),
            Callable::Memo(_) => 1,
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native(n) => write!(f, "<native {}>", n.name),
            Callable::Closure(c) => write!(f, "<closure {}>", c.name),
            Callable::Unary(_) => write!(f, "<unary {}>", self.name()),
            Callable::Once(_) => write!(f, "<once {}>", self.name()),
            Callable::Memo(_) => write!(f, "<memo {}>", self.name()),
        }
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Callable::Native(a), Callable::Native(b)) => a == b,
            (Callable::Closure(a), Callable::Closure(b)) => a == b,
            (Callable::Unary(a), Callable::Unary(b)) => a == b,
            // Stateful wrappers compare by allocation identity.
            _ => std::ptr::eq(self, other),
        }
    }
}

impl Value {
    fn callable_name(&self) -> &str {
        match self {
            Value::Callable(c) => c.name(),
            _ => "<value>",
        }
    }
}
