use crate::runtime::value::Value;

pub(super) fn format_hint(signature: &str) -> String {
    format!("\n\nUsage:\n  {}", signature)
}

pub(super) fn arity_error(name: &str, expected: &str, got: usize, signature: &str) -> String {
    format!(
        "wrong number of arguments\n\n  function: {}\n  expected: {}\n  got: {}{}",
        name,
        expected,
        got,
        format_hint(signature)
    )
}

pub(super) fn type_error(
    name: &str,
    label: &str,
    expected: &str,
    got: &str,
    signature: &str,
) -> String {
    format!(
        "{} expected {} to be {}, got {}{}",
        name,
        label,
        expected,
        got,
        format_hint(signature)
    )
}

pub(super) fn check_arity_range(
    args: &[Value],
    min: usize,
    max: usize,
    name: &str,
    signature: &str,
) -> Result<(), String> {
    if args.len() < min || args.len() > max {
        return Err(arity_error(
            name,
            &format!("{}..{}", min, max),
            args.len(),
            signature,
        ));
    }
    Ok(())
}

pub(super) fn arg_array<'a>(
    args: &'a [Value],
    index: usize,
    name: &str,
    label: &str,
    signature: &str,
) -> Result<&'a Vec<Value>, String> {
    match &args[index] {
        Value::Array(arr) => Ok(arr),
        other => Err(type_error(
            name,
            label,
            "Array",
            other.type_name(),
            signature,
        )),
    }
}

/// Reads the trailing optional receiver argument. A literal `None` argument
/// counts as absent, so `map(seq, f, None)` and `map(seq, f)` behave alike.
pub(super) fn opt_context(args: &[Value], index: usize) -> Option<Value> {
    args.get(index)
        .filter(|v| !matches!(v, Value::None))
        .cloned()
}
