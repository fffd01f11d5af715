use std::rc::Rc;

use crate::runtime::{
    RuntimeContext,
    callable::{Callable, MemoCache, OnceGuard, UnaryAdapter},
    hash_key::HASHABLE_HINT,
    value::Value,
};

/// Wrapper nesting and callback recursion both consume invoke depth; the cap
/// turns runaway nesting into an error instead of a host stack overflow.
const MAX_INVOKE_DEPTH: usize = 1024;

/// Default synchronous [`RuntimeContext`]: single-threaded, no suspension
/// points, every invocation runs to completion before returning.
pub struct Interp {
    depth: usize,
}

impl Interp {
    pub fn new() -> Self {
        Self { depth: 0 }
    }

    fn dispatch(
        &mut self,
        callee: Value,
        receiver: Option<Value>,
        args: Vec<Value>,
    ) -> Result<Value, String> {
        let callable = match callee {
            Value::Callable(c) => c,
            other => return Err(format!("calling non-callable: {}", other.type_name())),
        };
        match &*callable {
            Callable::Native(native) => (native.func)(self, receiver.as_ref(), args),
            Callable::Closure(closure) => (*closure.func)(self, receiver.as_ref(), args),
            Callable::Unary(adapter) => self.call_unary(adapter, receiver, args),
            Callable::Once(guard) => self.call_once(guard, receiver, args),
            Callable::Memo(memo) => self.call_memo(memo, receiver, args),
        }
    }

    /// Forwards only the first argument (absent becomes `None`) to the
    /// adapter's target.
    fn call_unary(
        &mut self,
        adapter: &UnaryAdapter,
        receiver: Option<Value>,
        args: Vec<Value>,
    ) -> Result<Value, String> {
        let first = args.into_iter().next().unwrap_or(Value::None);
        let recv = receiver.or_else(|| adapter.context.clone());
        self.invoke_value(adapter.target.clone(), recv, vec![first])
    }

    /// First invocation trips the latch and fires the target; every later
    /// invocation does no work and returns `None`. The latch trips before
    /// the target runs, so a failing first call still consumes the firing.
    fn call_once(
        &mut self,
        guard: &OnceGuard,
        receiver: Option<Value>,
        args: Vec<Value>,
    ) -> Result<Value, String> {
        if !guard.trip() {
            return Ok(Value::None);
        }
        let recv = receiver.or_else(|| guard.context.clone());
        self.invoke_value(guard.target.clone(), recv, args)
    }

    /// Memoized-call contract: `m(key)`, `m(key, override_receiver)`, or
    /// `m(key, override_receiver, inspect_flag)`.
    ///
    /// A truthy inspect flag returns the whole cache as a `Hash` snapshot
    /// without computing. Receiver precedence for the target: explicit
    /// override argument, then the receiver supplied at this invocation,
    /// then the bound context. A failing target stores nothing.
    fn call_memo(
        &mut self,
        memo: &MemoCache,
        receiver: Option<Value>,
        args: Vec<Value>,
    ) -> Result<Value, String> {
        if args.is_empty() || args.len() > 3 {
            return Err(format!(
                "wrong number of arguments: want=1..3, got={}",
                args.len()
            ));
        }
        if args.get(2).is_some_and(|flag| flag.is_truthy()) {
            return Ok(Value::Hash(Rc::new(memo.snapshot())));
        }
        let key = args[0].to_hash_key().ok_or_else(|| {
            format!(
                "memoized call key must be hashable ({}), got {}",
                HASHABLE_HINT,
                args[0].type_name()
            )
        })?;
        if let Some(hit) = memo.lookup(&key) {
            return Ok(hit);
        }
        let override_recv = args.get(1).filter(|v| !matches!(v, Value::None)).cloned();
        let recv = override_recv
            .or(receiver)
            .or_else(|| memo.context.clone());
        let result = self.invoke_value(memo.target.clone(), recv, vec![args[0].clone()])?;
        memo.store(key, result.clone());
        Ok(result)
    }
}

impl Default for Interp {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeContext for Interp {
    fn invoke_value(
        &mut self,
        callee: Value,
        receiver: Option<Value>,
        args: Vec<Value>,
    ) -> Result<Value, String> {
        if self.depth >= MAX_INVOKE_DEPTH {
            return Err("call depth exceeded".to_string());
        }
        self.depth += 1;
        let result = self.dispatch(callee, receiver, args);
        self.depth -= 1;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::hash_key::HashKey;

    fn identity() -> Value {
        Value::host_fn("identity", 1, |_ctx, _recv, mut args| Ok(args.remove(0)))
    }

    #[test]
    fn test_invoke_host_closure() {
        let mut interp = Interp::new();
        let result = interp
            .invoke_value(identity(), None, vec![Value::Integer(7)])
            .unwrap();
        assert_eq!(result, Value::Integer(7));
    }

    #[test]
    fn test_invoke_non_callable_fails() {
        let mut interp = Interp::new();
        let err = interp
            .invoke_value(Value::Integer(3), None, vec![])
            .unwrap_err();
        assert_eq!(err, "calling non-callable: Int");
    }

    #[test]
    fn test_receiver_reaches_closure() {
        let reflect = Value::host_fn("reflect", 0, |_ctx, recv, _args| {
            Ok(recv.cloned().unwrap_or(Value::None))
        });
        let mut interp = Interp::new();
        let result = interp
            .invoke_value(reflect.clone(), Some(Value::string("ctx")), vec![])
            .unwrap();
        assert_eq!(result, Value::string("ctx"));

        let absent = interp.invoke_value(reflect, None, vec![]).unwrap();
        assert_eq!(absent, Value::None);
    }

    #[test]
    fn test_unary_adapter_bound_context_yields_to_invocation_receiver() {
        let reflect = Value::host_fn("reflect", 2, |_ctx, recv, _args| {
            Ok(recv.cloned().unwrap_or(Value::None))
        });
        let adapter = Value::callable(Callable::Unary(UnaryAdapter::new(
            reflect,
            Some(Value::string("bound")),
        )));
        let mut interp = Interp::new();

        let bound = interp
            .invoke_value(adapter.clone(), None, vec![Value::Integer(1)])
            .unwrap();
        assert_eq!(bound, Value::string("bound"));

        let overridden = interp
            .invoke_value(
                adapter,
                Some(Value::string("call-site")),
                vec![Value::Integer(1)],
            )
            .unwrap();
        assert_eq!(overridden, Value::string("call-site"));
    }

    #[test]
    fn test_unary_adapter_with_no_arguments_forwards_none() {
        let adapter = Value::callable(Callable::Unary(UnaryAdapter::new(identity(), None)));
        let mut interp = Interp::new();
        let result = interp.invoke_value(adapter, None, vec![]).unwrap();
        assert_eq!(result, Value::None);
    }

    #[test]
    fn test_depth_cap_reports_error() {
        let mut wrapped = identity();
        for _ in 0..2048 {
            wrapped = Value::callable(Callable::Unary(UnaryAdapter::new(wrapped, None)));
        }
        let mut interp = Interp::new();
        let err = interp
            .invoke_value(wrapped, None, vec![Value::Integer(1)])
            .unwrap_err();
        assert_eq!(err, "call depth exceeded");
    }

    #[test]
    fn test_depth_resets_between_invocations() {
        let mut interp = Interp::new();
        for _ in 0..8 {
            let result = interp
                .invoke_value(identity(), None, vec![Value::Integer(1)])
                .unwrap();
            assert_eq!(result, Value::Integer(1));
        }
    }

    #[test]
    fn test_memo_rejects_unhashable_key() {
        let memo = Value::callable(Callable::Memo(MemoCache::new(identity(), None)));
        let mut interp = Interp::new();
        let err = interp
            .invoke_value(memo, None, vec![Value::array(vec![])])
            .unwrap_err();
        assert_eq!(
            err,
            "memoized call key must be hashable (String, Int, Bool), got Array"
        );
    }

    #[test]
    fn test_memo_argument_count_bounds() {
        let memo = Value::callable(Callable::Memo(MemoCache::new(identity(), None)));
        let mut interp = Interp::new();
        let err = interp.invoke_value(memo.clone(), None, vec![]).unwrap_err();
        assert_eq!(err, "wrong number of arguments: want=1..3, got=0");

        let err = interp
            .invoke_value(
                memo,
                None,
                vec![
                    Value::Integer(1),
                    Value::None,
                    Value::Boolean(false),
                    Value::Integer(4),
                ],
            )
            .unwrap_err();
        assert_eq!(err, "wrong number of arguments: want=1..3, got=4");
    }

    #[test]
    fn test_memo_inspect_snapshot_is_a_hash() {
        let memo = Value::callable(Callable::Memo(MemoCache::new(identity(), None)));
        let mut interp = Interp::new();
        interp
            .invoke_value(memo.clone(), None, vec![Value::Integer(4)])
            .unwrap();
        let snapshot = interp
            .invoke_value(
                memo,
                None,
                vec![Value::None, Value::None, Value::Boolean(true)],
            )
            .unwrap();
        match snapshot {
            Value::Hash(pairs) => {
                assert_eq!(pairs.get(&HashKey::Integer(4)), Some(&Value::Integer(4)));
            }
            other => panic!("expected hash snapshot, got {}", other),
        }
    }
}
