//! sift: higher-order sequence and function transforms over dynamic values.
//!
//! The crate ships a small dynamic [`runtime::value::Value`] model, an
//! invocation seam ([`runtime::RuntimeContext`] / [`runtime::interp::Interp`]),
//! and a registry of [`transforms`]: `map`, `filter`, `for_each`, `every`,
//! `any`, `zip` over arrays, plus the `unary`, `once`, and `memoize` function
//! wrappers. Hosts pass Rust closures in via [`runtime::value::Value::host_fn`].

pub mod runtime;
pub mod transforms;
