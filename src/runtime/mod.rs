//! Runtime core: values, callables, and the invocation seam.
//!
//! # No-Cycle Invariant
//! Values are immutable graphs shared with `Rc`, so the value graph must stay
//! acyclic. Wrappers (`once`, `memoize`, `unary`) hold their target callable
//! and optional bound context as captured values; a captured value must never
//! reference the capturing wrapper. Wrapper-internal state (`Cell`, `RefCell`)
//! is interior-mutable but single-threaded: the crate is intentionally not
//! `Send`/`Sync`.
use crate::runtime::value::Value;

pub mod callable;
pub mod hash_key;
pub mod interp;
pub mod json;
pub mod stats;
pub mod value;

/// Host-registered function pointer.
///
/// The receiver is the explicit stand-in for an implicit "self": transforms
/// thread it through every invocation, and most natives ignore it.
pub type NativeFn =
    fn(&mut dyn RuntimeContext, Option<&Value>, Vec<Value>) -> Result<Value, String>;

/// The single invocation seam.
///
/// Everything that calls a callable — the sequence transforms, the function
/// wrappers, a host embedding — goes through `invoke_value`, so a custom
/// implementation can observe or intercept every call.
pub trait RuntimeContext {
    /// Invokes `callee` with an explicit optional receiver and arguments.
    ///
    /// Fails with `calling non-callable: <type>` when `callee` is not a
    /// callable value. Declared arity is not enforced here; callables
    /// validate their own arguments.
    fn invoke_value(
        &mut self,
        callee: Value,
        receiver: Option<Value>,
        args: Vec<Value>,
    ) -> Result<Value, String>;
}
