use std::rc::Rc;

use crate::runtime::{RuntimeContext, value::Value};

use super::helpers::{arg_array, check_arity_range, opt_context};

/// map(seq, fn, context?) - Apply fn to each element, return new array of results
///
/// The callback is invoked with exactly one argument per element, under the
/// optional receiver. Elements are processed in left-to-right order; the
/// result has the same length as the input and the input is never mutated.
pub fn native_map(
    ctx: &mut dyn RuntimeContext,
    _recv: Option<&Value>,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity_range(&args, 2, 3, "map", "map(seq, fn, context?)")?;
    let seq = arg_array(&args, 0, "map", "first argument", "map(seq, fn, context?)")?;
    let func = args[1].clone();
    let context = opt_context(&args, 2);

    let mut results = Vec::with_capacity(seq.len());
    for (idx, item) in seq.iter().enumerate() {
        let result = ctx
            .invoke_value(func.clone(), context.clone(), vec![item.clone()])
            .map_err(|e| format!("map: callback error at index {}: {}", idx, e))?;
        results.push(result);
    }
    Ok(Value::Array(Rc::new(results)))
}

/// filter(seq, pred, context?) - Keep elements where pred returns truthy
///
/// Kept elements appear in their original order. The predicate is invoked for
/// every element; skipped elements see no other side effect.
pub fn native_filter(
    ctx: &mut dyn RuntimeContext,
    _recv: Option<&Value>,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity_range(&args, 2, 3, "filter", "filter(seq, pred, context?)")?;
    let seq = arg_array(
        &args,
        0,
        "filter",
        "first argument",
        "filter(seq, pred, context?)",
    )?;
    let func = args[1].clone();
    let context = opt_context(&args, 2);

    let mut results = Vec::new();
    for (idx, item) in seq.iter().enumerate() {
        let result = ctx
            .invoke_value(func.clone(), context.clone(), vec![item.clone()])
            .map_err(|e| format!("filter: callback error at index {}: {}", idx, e))?;
        if result.is_truthy() {
            results.push(item.clone());
        }
    }
    Ok(Value::Array(Rc::new(results)))
}

/// for_each(seq, fn, context?) - Invoke fn per element for its side effects
///
/// Index order, no return value.
pub fn native_for_each(
    ctx: &mut dyn RuntimeContext,
    _recv: Option<&Value>,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity_range(&args, 2, 3, "for_each", "for_each(seq, fn, context?)")?;
    let seq = arg_array(
        &args,
        0,
        "for_each",
        "first argument",
        "for_each(seq, fn, context?)",
    )?;
    let func = args[1].clone();
    let context = opt_context(&args, 2);

    for (idx, item) in seq.iter().enumerate() {
        ctx.invoke_value(func.clone(), context.clone(), vec![item.clone()])
            .map_err(|e| format!("for_each: callback error at index {}: {}", idx, e))?;
    }
    Ok(Value::None)
}

/// every(seq, pred, context?) - True iff pred is truthy for all elements
///
/// The predicate runs for every element; a decided outcome does not stop
/// iteration. Vacuously true on an empty sequence.
pub fn native_every(
    ctx: &mut dyn RuntimeContext,
    _recv: Option<&Value>,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity_range(&args, 2, 3, "every", "every(seq, pred, context?)")?;
    let seq = arg_array(
        &args,
        0,
        "every",
        "first argument",
        "every(seq, pred, context?)",
    )?;
    let func = args[1].clone();
    let context = opt_context(&args, 2);

    let mut all_truthy = true;
    for (idx, item) in seq.iter().enumerate() {
        let result = ctx
            .invoke_value(func.clone(), context.clone(), vec![item.clone()])
            .map_err(|e| format!("every: callback error at index {}: {}", idx, e))?;
        all_truthy &= result.is_truthy();
    }
    Ok(Value::Boolean(all_truthy))
}

/// any(seq, pred, context?) - True iff pred is truthy for at least one element
///
/// Like `every`, runs the predicate for every element with no short-circuit.
/// False on an empty sequence.
pub fn native_any(
    ctx: &mut dyn RuntimeContext,
    _recv: Option<&Value>,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity_range(&args, 2, 3, "any", "any(seq, pred, context?)")?;
    let seq = arg_array(&args, 0, "any", "first argument", "any(seq, pred, context?)")?;
    let func = args[1].clone();
    let context = opt_context(&args, 2);

    let mut any_truthy = false;
    for (idx, item) in seq.iter().enumerate() {
        let result = ctx
            .invoke_value(func.clone(), context.clone(), vec![item.clone()])
            .map_err(|e| format!("any: callback error at index {}: {}", idx, e))?;
        any_truthy |= result.is_truthy();
    }
    Ok(Value::Boolean(any_truthy))
}

/// zip(left, right, fn, context?) - Combine paired elements into a new array
///
/// The result length is the shorter input's length; surplus elements on the
/// longer side are ignored, not an error.
pub fn native_zip(
    ctx: &mut dyn RuntimeContext,
    _recv: Option<&Value>,
    args: Vec<Value>,
) -> Result<Value, String> {
    check_arity_range(&args, 3, 4, "zip", "zip(left, right, fn, context?)")?;
    let left = arg_array(
        &args,
        0,
        "zip",
        "first argument",
        "zip(left, right, fn, context?)",
    )?;
    let right = arg_array(
        &args,
        1,
        "zip",
        "second argument",
        "zip(left, right, fn, context?)",
    )?;
    let func = args[2].clone();
    let context = opt_context(&args, 3);

    let len = left.len().min(right.len());
    let mut results = Vec::with_capacity(len);
    for idx in 0..len {
        let result = ctx
            .invoke_value(
                func.clone(),
                context.clone(),
                vec![left[idx].clone(), right[idx].clone()],
            )
            .map_err(|e| format!("zip: callback error at index {}: {}", idx, e))?;
        results.push(result);
    }
    Ok(Value::Array(Rc::new(results)))
}
