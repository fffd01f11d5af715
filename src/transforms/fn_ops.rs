use crate::runtime::{
    RuntimeContext,
    callable::{Callable, MemoCache, OnceGuard, UnaryAdapter},
    value::Value,
};

use super::helpers::{check_arity_range, opt_context};

/// unary(fn, context?) - Adapt a callable so only its first argument is forwarded
///
/// A target that already declares arity 1, with no context to bind, is
/// returned unchanged (same value, not a new wrapper). Anything else is
/// wrapped in an adapter of declared arity 1 that invokes the target with
/// exactly one argument under the bound context. The target is not checked
/// for callability here; an uninvokable target fails at its first invocation.
pub fn native_unary(
    _ctx: &mut dyn RuntimeContext,
    _recv: Option<&Value>,
    mut args: Vec<Value>,
) -> Result<Value, String> {
    check_arity_range(&args, 1, 2, "unary", "unary(fn, context?)")?;
    let context = opt_context(&args, 1);
    let target = args.swap_remove(0);

    if context.is_none() && target.declared_arity() == Some(1) {
        return Ok(target);
    }
    Ok(Value::callable(Callable::Unary(UnaryAdapter::new(
        target, context,
    ))))
}

/// once(fn, context?) - Wrap a callable so it can fire at most once
///
/// The first invocation of the returned callable runs the target and returns
/// its result; every later invocation returns `None` without running
/// anything. The latch is irreversible for the wrapper's lifetime.
pub fn native_once(
    _ctx: &mut dyn RuntimeContext,
    _recv: Option<&Value>,
    mut args: Vec<Value>,
) -> Result<Value, String> {
    check_arity_range(&args, 1, 2, "once", "once(fn, context?)")?;
    let context = opt_context(&args, 1);
    let target = args.swap_remove(0);
    Ok(Value::callable(Callable::Once(OnceGuard::new(
        target, context,
    ))))
}

/// memoize(fn, context?) - Wrap a callable with a keyed result cache
///
/// The returned callable accepts a cache key, an optional override receiver,
/// and an optional inspect flag; see the memoized-call contract on the
/// interpreter. Each wrapper owns its own cache; caches are never shared and
/// never evicted.
pub fn native_memoize(
    _ctx: &mut dyn RuntimeContext,
    _recv: Option<&Value>,
    mut args: Vec<Value>,
) -> Result<Value, String> {
    check_arity_range(&args, 1, 2, "memoize", "memoize(fn, context?)")?;
    let context = opt_context(&args, 1);
    let target = args.swap_remove(0);
    Ok(Value::callable(Callable::Memo(MemoCache::new(
        target, context,
    ))))
}
