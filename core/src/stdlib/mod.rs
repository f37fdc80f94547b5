//! Built-in function packages.
//!
//! The default registry is assembled from these modules: math, string, and
//! utility functions. Every builtin is a plain `fn` wrapped in
//! [`NativeFunction`], so plugins and builtins go through the same
//! [`Function`](crate::registry::Function) machinery and a plugin can
//! replace any builtin by registering the same name.

use std::sync::Arc;

use crate::evaluator::RuntimeError;
use crate::registry::{Arity, FunctionTable, NativeFn, NativeFunction};
use crate::values::Value;

pub(crate) mod math;
pub(crate) mod string;
pub(crate) mod util;

/// Build the default function table: math ∪ string ∪ util.
pub(crate) fn default_functions() -> FunctionTable {
    let mut table = FunctionTable::new();
    math::install(&mut table);
    string::install(&mut table);
    util::install(&mut table);
    table
}

pub(super) fn register(table: &mut FunctionTable, name: &'static str, arity: Arity, f: NativeFn) {
    table.insert(name.to_string(), Arc::new(NativeFunction::new(name, arity, f)));
}

// ----------------------------------------------------------------------
// Shared argument helpers
// ----------------------------------------------------------------------

pub(super) fn fail(name: &str, message: impl Into<String>) -> RuntimeError {
    RuntimeError::Function {
        name: name.to_string(),
        message: message.into(),
    }
}

/// Numeric argument with `Int → Float` coercion.
pub(super) fn number(name: &str, v: &Value) -> Result<f64, RuntimeError> {
    v.as_number()
        .ok_or_else(|| fail(name, format!("expects a number, got {}", v.kind())))
}

pub(super) fn integer(name: &str, v: &Value) -> Result<i64, RuntimeError> {
    v.as_int()
        .ok_or_else(|| fail(name, format!("expects an integer, got {}", v.kind())))
}

pub(super) fn text<'a>(name: &str, v: &'a Value) -> Result<&'a str, RuntimeError> {
    v.as_str()
        .ok_or_else(|| fail(name, format!("expects a string, got {}", v.kind())))
}

/// Runtime argument-count check for `Arity::Any` functions.
pub(super) fn arg_range(
    name: &str,
    args: &[Value],
    min: usize,
    max: usize,
) -> Result<(), RuntimeError> {
    if args.len() < min || args.len() > max {
        return Err(fail(
            name,
            format!(
                "expects {} to {} arguments, got {}",
                min,
                max,
                args.len()
            ),
        ));
    }
    Ok(())
}

/// Variadic numeric input: either the argument list itself, or a single
/// list argument (`sum(xs)` and `sum(a, b, c)` both work).
pub(super) fn spreadable<'a>(args: &'a [Value]) -> &'a [Value] {
    match args {
        [Value::List(items)] => items.as_slice(),
        _ => args,
    }
}
