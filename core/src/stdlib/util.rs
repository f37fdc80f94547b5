//! Utility builtins.
//!
//! Functions: if, ifnull, coalesce, switch, and, or, lookup.
//!
//! These are plain functions: their arguments are evaluated before the
//! call, unlike the `?:` and `&&`/`||` operators, which short-circuit.

use crate::evaluator::RuntimeError;
use crate::registry::{Arity, FunctionTable};
use crate::values::{Symbol, Value};

use super::{arg_range, fail, register};

pub(crate) fn install(table: &mut FunctionTable) {
    register(table, "if", Arity::Fixed(3), util_if);
    register(table, "ifnull", Arity::Fixed(2), util_ifnull);
    register(table, "coalesce", Arity::Any, util_coalesce);
    register(table, "switch", Arity::Any, util_switch);
    register(table, "and", Arity::Any, util_and);
    register(table, "or", Arity::Any, util_or);
    register(table, "lookup", Arity::Any, util_lookup);
}

fn util_if(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(if args[0].is_truthy() {
        args[1].clone()
    } else {
        args[2].clone()
    })
}

fn util_ifnull(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(match &args[0] {
        Value::Null => args[1].clone(),
        v => v.clone(),
    })
}

fn util_coalesce(args: &[Value]) -> Result<Value, RuntimeError> {
    for v in args {
        if !matches!(v, Value::Null) {
            return Ok(v.clone());
        }
    }
    Ok(Value::Null)
}

/// `switch(expr, c1, v1, c2, v2, …, default?)`: first case equal to `expr`
/// wins; a trailing odd argument is the default, otherwise `Null`.
fn util_switch(args: &[Value]) -> Result<Value, RuntimeError> {
    if args.is_empty() {
        return Err(fail("switch", "expects a subject argument"));
    }
    let subject = &args[0];
    let mut i = 1;
    while i + 1 < args.len() {
        if &args[i] == subject {
            return Ok(args[i + 1].clone());
        }
        i += 2;
    }
    Ok(if i < args.len() {
        args[i].clone()
    } else {
        Value::Null
    })
}

fn util_and(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::Bool(args.iter().all(Value::is_truthy)))
}

fn util_or(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::Bool(args.iter().any(Value::is_truthy)))
}

/// `lookup(coll, key[, default])`: keyed or indexed lookup that yields the
/// default (or `Null`) instead of an error on a miss.
fn util_lookup(args: &[Value]) -> Result<Value, RuntimeError> {
    arg_range("lookup", args, 2, 3)?;
    let miss = || args.get(2).cloned().unwrap_or(Value::Null);
    let found = match (&args[0], &args[1]) {
        (Value::Map(map), Value::String(key)) => map.get(key.as_ref()).cloned(),
        (Value::Struct(fields), Value::String(key)) => {
            Symbol::lookup(key).and_then(|sym| fields.get(&sym).cloned())
        }
        (Value::List(items), Value::Int(index)) => usize::try_from(*index)
            .ok()
            .and_then(|i| items.get(i).cloned()),
        _ => None,
    };
    Ok(found.unwrap_or_else(miss))
}

#[cfg(test)]
#[path = "util_test.rs"]
mod util_test;
