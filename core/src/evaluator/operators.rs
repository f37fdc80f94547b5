//! Operator semantics.
//!
//! Numeric coercion: `Int op Int → Int`, any `Float` operand promotes the
//! operation to `Float`. `/` always divides in floating point, `%` keeps the
//! sign of the dividend, `^` is floating-point power. Bitwise operators
//! require integers. Comparisons are total within numbers, strings, and
//! booleans; `==`/`!=` across kinds is defined (false/true), ordering across
//! kinds is a runtime error.

use std::cmp::Ordering;

use crate::parser::{BinaryOp, UnaryOp};
use crate::values::Value;

use super::error::RuntimeError;

enum Num {
    Int(i64),
    Float(f64),
}

fn numeric(v: &Value) -> Option<Num> {
    match v {
        Value::Int(n) => Some(Num::Int(*n)),
        Value::Float(f) => Some(Num::Float(*f)),
        _ => None,
    }
}

/// Evaluate a non-short-circuiting binary operator.
///
/// `&&` and `||` are lowered by the compiler and never reach this function.
pub(crate) fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match op {
        BinaryOp::Add => arith(op, left, right, i64::checked_add, |a, b| a + b),
        BinaryOp::Sub => arith(op, left, right, i64::checked_sub, |a, b| a - b),
        BinaryOp::Mul => arith(op, left, right, i64::checked_mul, |a, b| a * b),
        BinaryOp::Div => divide(left, right),
        BinaryOp::Mod => modulo(left, right),
        BinaryOp::Pow => power(left, right),
        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::Ne => Ok(Value::Bool(left != right)),
        BinaryOp::Lt => ordering(left, right).map(|o| Value::Bool(o == Ordering::Less)),
        BinaryOp::Le => ordering(left, right).map(|o| Value::Bool(o != Ordering::Greater)),
        BinaryOp::Gt => ordering(left, right).map(|o| Value::Bool(o == Ordering::Greater)),
        BinaryOp::Ge => ordering(left, right).map(|o| Value::Bool(o != Ordering::Less)),
        BinaryOp::BitAnd => bitwise(op, left, right, |a, b| Ok(a & b)),
        BinaryOp::BitOr => bitwise(op, left, right, |a, b| Ok(a | b)),
        BinaryOp::BitXor => bitwise(op, left, right, |a, b| Ok(a ^ b)),
        BinaryOp::Shl => bitwise(op, left, right, shl),
        BinaryOp::Shr => bitwise(op, left, right, shr),
        BinaryOp::And | BinaryOp::Or => {
            unreachable!("short-circuit operators are lowered by the compiler")
        }
    }
}

pub(crate) fn unary(op: UnaryOp, operand: &Value) -> Result<Value, RuntimeError> {
    match op {
        UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
        UnaryOp::Neg => match operand {
            Value::Int(n) => n
                .checked_neg()
                .map(Value::Int)
                .ok_or(RuntimeError::IntegerOverflow { op: "-" }),
            Value::Float(f) => Ok(Value::Float(-f)),
            other => Err(RuntimeError::NumericOperand {
                op: "-",
                operand: other.kind(),
            }),
        },
        UnaryOp::BNot => match operand {
            Value::Int(n) => Ok(Value::Int(!n)),
            other => Err(RuntimeError::NumericOperand {
                op: "~",
                operand: other.kind(),
            }),
        },
    }
}

/// Postfix `n!`: non-negative integers only.
pub(crate) fn factorial(operand: &Value) -> Result<Value, RuntimeError> {
    let n = match operand {
        Value::Int(n) if *n >= 0 => *n,
        other => {
            return Err(RuntimeError::FactorialOperand {
                actual: other.to_string(),
            })
        }
    };
    let mut acc: i64 = 1;
    for k in 2..=n {
        acc = acc
            .checked_mul(k)
            .ok_or(RuntimeError::IntegerOverflow { op: "!" })?;
    }
    Ok(Value::Int(acc))
}

fn arith(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, RuntimeError> {
    match (numeric(left), numeric(right)) {
        (Some(Num::Int(a)), Some(Num::Int(b))) => int_op(a, b)
            .map(Value::Int)
            .ok_or(RuntimeError::IntegerOverflow { op: op.symbol() }),
        (Some(a), Some(b)) => Ok(Value::Float(float_op(as_f64(a), as_f64(b)))),
        _ => Err(numeric_operands(op, left, right)),
    }
}

fn divide(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match (numeric(left), numeric(right)) {
        (Some(a), Some(b)) => {
            let b = as_f64(b);
            if b == 0.0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Ok(Value::Float(as_f64(a) / b))
        }
        _ => Err(numeric_operands(BinaryOp::Div, left, right)),
    }
}

fn modulo(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match (numeric(left), numeric(right)) {
        (Some(Num::Int(a)), Some(Num::Int(b))) => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            // i64::MIN % -1 overflows in two's complement.
            a.checked_rem(b)
                .map(Value::Int)
                .ok_or(RuntimeError::IntegerOverflow { op: "%" })
        }
        (Some(a), Some(b)) => {
            let b = as_f64(b);
            if b == 0.0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Ok(Value::Float(as_f64(a) % b))
        }
        _ => Err(numeric_operands(BinaryOp::Mod, left, right)),
    }
}

fn power(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match (numeric(left), numeric(right)) {
        (Some(a), Some(b)) => Ok(Value::Float(as_f64(a).powf(as_f64(b)))),
        _ => Err(numeric_operands(BinaryOp::Pow, left, right)),
    }
}

fn bitwise(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    f: fn(i64, i64) -> Result<i64, RuntimeError>,
) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => f(*a, *b).map(Value::Int),
        _ => Err(RuntimeError::IntegerOperands {
            op: op.symbol(),
            left: left.kind(),
            right: right.kind(),
        }),
    }
}

fn shl(a: i64, b: i64) -> Result<i64, RuntimeError> {
    match u32::try_from(b) {
        Ok(amount) if amount < 64 => Ok(a << amount),
        _ => Err(RuntimeError::ShiftOutOfRange { amount: b }),
    }
}

fn shr(a: i64, b: i64) -> Result<i64, RuntimeError> {
    match u32::try_from(b) {
        Ok(amount) if amount < 64 => Ok(a >> amount),
        _ => Err(RuntimeError::ShiftOutOfRange { amount: b }),
    }
}

/// Ordering across compatible groups: numbers (coerced), strings, booleans.
fn ordering(left: &Value, right: &Value) -> Result<Ordering, RuntimeError> {
    let incomparable = || RuntimeError::Incomparable {
        left: left.kind(),
        right: right.kind(),
    };
    match (left, right) {
        (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
        _ => match (numeric(left), numeric(right)) {
            // NaN operands have no ordering; report them as incomparable.
            (Some(a), Some(b)) => as_f64(a).partial_cmp(&as_f64(b)).ok_or_else(incomparable),
            _ => Err(incomparable()),
        },
    }
}

fn as_f64(n: Num) -> f64 {
    match n {
        Num::Int(i) => i as f64,
        Num::Float(f) => f,
    }
}

fn numeric_operands(op: BinaryOp, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::NumericOperands {
        op: op.symbol(),
        left: left.kind(),
        right: right.kind(),
    }
}
