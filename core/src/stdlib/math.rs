//! Math builtins.
//!
//! Functions: abs, round, floor, ceil, trunc, sign, max, min, sqrt, exp,
//! ln, log, log10, sum, avg.
//!
//! Rounding functions return `Int`; `sqrt`/`exp`/`ln`/`log`/`log10` return
//! `Float`. `max`/`min`/`sum`/`avg` accept either a plain argument list or
//! a single list value, which pairs them with `[*]` spreads.

use crate::evaluator::RuntimeError;
use crate::registry::{Arity, FunctionTable};
use crate::values::Value;

use super::{fail, number, register, spreadable};

pub(crate) fn install(table: &mut FunctionTable) {
    register(table, "abs", Arity::Fixed(1), math_abs);
    register(table, "round", Arity::Fixed(1), math_round);
    register(table, "floor", Arity::Fixed(1), math_floor);
    register(table, "ceil", Arity::Fixed(1), math_ceil);
    register(table, "trunc", Arity::Fixed(1), math_trunc);
    register(table, "sign", Arity::Fixed(1), math_sign);
    register(table, "max", Arity::Any, math_max);
    register(table, "min", Arity::Any, math_min);
    register(table, "sqrt", Arity::Fixed(1), math_sqrt);
    register(table, "exp", Arity::Fixed(1), math_exp);
    register(table, "ln", Arity::Fixed(1), math_ln);
    register(table, "log", Arity::Fixed(2), math_log);
    register(table, "log10", Arity::Fixed(1), math_log10);
    register(table, "sum", Arity::Any, math_sum);
    register(table, "avg", Arity::Any, math_avg);
}

// ============================================================================
// Basic operations
// ============================================================================

fn math_abs(args: &[Value]) -> Result<Value, RuntimeError> {
    match &args[0] {
        Value::Int(n) => n
            .checked_abs()
            .map(Value::Int)
            .ok_or(RuntimeError::IntegerOverflow { op: "abs" }),
        Value::Float(f) => Ok(Value::Float(f.abs())),
        other => Err(fail("abs", format!("expects a number, got {}", other.kind()))),
    }
}

fn math_sign(args: &[Value]) -> Result<Value, RuntimeError> {
    match &args[0] {
        Value::Int(n) => Ok(Value::Int(n.signum())),
        Value::Float(f) => Ok(Value::Int(if *f > 0.0 {
            1
        } else if *f < 0.0 {
            -1
        } else {
            0
        })),
        other => Err(fail("sign", format!("expects a number, got {}", other.kind()))),
    }
}

fn math_max(args: &[Value]) -> Result<Value, RuntimeError> {
    pick("max", spreadable(args), |candidate, best| candidate > best)
}

fn math_min(args: &[Value]) -> Result<Value, RuntimeError> {
    pick("min", spreadable(args), |candidate, best| candidate < best)
}

/// Fold for max/min: keeps the original value (an all-int input stays int).
fn pick(
    name: &str,
    values: &[Value],
    better: fn(f64, f64) -> bool,
) -> Result<Value, RuntimeError> {
    let mut iter = values.iter();
    let first = iter
        .next()
        .ok_or_else(|| fail(name, "expects at least one value"))?;
    let mut best = first.clone();
    let mut best_key = number(name, first)?;
    for v in iter {
        let key = number(name, v)?;
        if better(key, best_key) {
            best = v.clone();
            best_key = key;
        }
    }
    Ok(best)
}

// ============================================================================
// Rounding
// ============================================================================

fn math_round(args: &[Value]) -> Result<Value, RuntimeError> {
    rounding("round", &args[0], f64::round)
}

fn math_floor(args: &[Value]) -> Result<Value, RuntimeError> {
    rounding("floor", &args[0], f64::floor)
}

fn math_ceil(args: &[Value]) -> Result<Value, RuntimeError> {
    rounding("ceil", &args[0], f64::ceil)
}

fn math_trunc(args: &[Value]) -> Result<Value, RuntimeError> {
    rounding("trunc", &args[0], f64::trunc)
}

fn rounding(name: &str, v: &Value, f: fn(f64) -> f64) -> Result<Value, RuntimeError> {
    match v {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Float(x) => Ok(Value::Int(f(*x) as i64)),
        other => Err(fail(name, format!("expects a number, got {}", other.kind()))),
    }
}

// ============================================================================
// Exponentials and logarithms
// ============================================================================

fn math_sqrt(args: &[Value]) -> Result<Value, RuntimeError> {
    let x = number("sqrt", &args[0])?;
    if x < 0.0 {
        return Err(fail("sqrt", "square root of a negative number"));
    }
    Ok(Value::Float(x.sqrt()))
}

fn math_exp(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::Float(number("exp", &args[0])?.exp()))
}

fn math_ln(args: &[Value]) -> Result<Value, RuntimeError> {
    let x = number("ln", &args[0])?;
    if x <= 0.0 {
        return Err(fail("ln", "logarithm of a non-positive number"));
    }
    Ok(Value::Float(x.ln()))
}

fn math_log(args: &[Value]) -> Result<Value, RuntimeError> {
    let x = number("log", &args[0])?;
    let base = number("log", &args[1])?;
    if x <= 0.0 {
        return Err(fail("log", "logarithm of a non-positive number"));
    }
    if base <= 0.0 || base == 1.0 {
        return Err(fail("log", "invalid logarithm base"));
    }
    Ok(Value::Float(x.log(base)))
}

fn math_log10(args: &[Value]) -> Result<Value, RuntimeError> {
    let x = number("log10", &args[0])?;
    if x <= 0.0 {
        return Err(fail("log10", "logarithm of a non-positive number"));
    }
    Ok(Value::Float(x.log10()))
}

// ============================================================================
// Aggregates
// ============================================================================

fn math_sum(args: &[Value]) -> Result<Value, RuntimeError> {
    let values = spreadable(args);
    // Stay integral while every addend is an int.
    let mut int_acc: Option<i64> = Some(0);
    let mut float_acc = 0.0;
    for v in values {
        match (&mut int_acc, v) {
            (Some(acc), Value::Int(n)) => {
                *acc = acc
                    .checked_add(*n)
                    .ok_or(RuntimeError::IntegerOverflow { op: "sum" })?;
            }
            (acc, _) => {
                if let Some(partial) = acc.take() {
                    float_acc = partial as f64;
                }
                float_acc += number("sum", v)?;
            }
        }
    }
    Ok(match int_acc {
        Some(n) => Value::Int(n),
        None => Value::Float(float_acc),
    })
}

fn math_avg(args: &[Value]) -> Result<Value, RuntimeError> {
    let values = spreadable(args);
    if values.is_empty() {
        return Err(fail("avg", "expects at least one value"));
    }
    let mut total = 0.0;
    for v in values {
        total += number("avg", v)?;
    }
    Ok(Value::Float(total / values.len() as f64))
}

#[cfg(test)]
#[path = "math_test.rs"]
mod math_test;
