//! The transform library: higher-order sequence and function operations.
//!
//! Every operation is a [`NativeFunction`] registered in [`TRANSFORMS`], so a
//! host can dispatch by name or index, and each is also exported as a plain
//! Rust function. All of them take their optional receiver as a trailing
//! argument and thread it to the callback explicitly.
use crate::runtime::callable::NativeFunction;

mod fn_ops;
mod helpers;
mod seq_ops;

pub use fn_ops::{native_memoize, native_once, native_unary};
pub use seq_ops::{
    native_any, native_every, native_filter, native_for_each, native_map, native_zip,
};

/// All transforms in registration order (index is stable for hosts that
/// dispatch by index). The arity field is the full declared parameter count,
/// optional trailing context included.
pub static TRANSFORMS: &[NativeFunction] = &[
    NativeFunction {
        name: "map",
        arity: 3,
        func: native_map,
    },
    NativeFunction {
        name: "filter",
        arity: 3,
        func: native_filter,
    },
    NativeFunction {
        name: "for_each",
        arity: 3,
        func: native_for_each,
    },
    NativeFunction {
        name: "every",
        arity: 3,
        func: native_every,
    },
    NativeFunction {
        name: "any",
        arity: 3,
        func: native_any,
    },
    NativeFunction {
        name: "zip",
        arity: 4,
        func: native_zip,
    },
    NativeFunction {
        name: "unary",
        arity: 2,
        func: native_unary,
    },
    NativeFunction {
        name: "once",
        arity: 2,
        func: native_once,
    },
    NativeFunction {
        name: "memoize",
        arity: 2,
        func: native_memoize,
    },
];

pub fn get_transform(name: &str) -> Option<&'static NativeFunction> {
    TRANSFORMS.iter().find(|t| t.name == name)
}

pub fn get_transform_index(name: &str) -> Option<usize> {
    TRANSFORMS.iter().position(|t| t.name == name)
}

pub fn get_transform_by_index(index: usize) -> Option<&'static NativeFunction> {
    TRANSFORMS.get(index)
}
