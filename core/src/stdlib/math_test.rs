//! Math builtin tests.

use crate::api::{self, ErrorKind};
use crate::values::Value;
use serde_json::json;

fn eval(source: &str) -> Value {
    api::eval(source, &Value::from(json!({}))).unwrap()
}

fn eval_in(source: &str, scope: serde_json::Value) -> Value {
    api::eval(source, &Value::from(scope)).unwrap()
}

fn eval_err(source: &str) -> api::Error {
    api::eval(source, &Value::from(json!({}))).unwrap_err()
}

#[test]
fn test_abs() {
    assert_eq!(eval("abs(-10)"), Value::Int(10));
    assert_eq!(eval("abs(10)"), Value::Int(10));
    assert_eq!(eval("abs(-2.5)"), Value::Float(2.5));
}

#[test]
fn test_rounding() {
    assert_eq!(eval("round(2.5)"), Value::Int(3));
    assert_eq!(eval("round(-2.5)"), Value::Int(-3));
    assert_eq!(eval("floor(2.9)"), Value::Int(2));
    assert_eq!(eval("floor(-2.1)"), Value::Int(-3));
    assert_eq!(eval("ceil(2.1)"), Value::Int(3));
    assert_eq!(eval("trunc(-2.9)"), Value::Int(-2));
    assert_eq!(eval("round(7)"), Value::Int(7));
}

#[test]
fn test_sign() {
    assert_eq!(eval("sign(-3)"), Value::Int(-1));
    assert_eq!(eval("sign(0)"), Value::Int(0));
    assert_eq!(eval("sign(2.5)"), Value::Int(1));
}

#[test]
fn test_max_min_variadic() {
    assert_eq!(eval("max(1, 7, 3)"), Value::Int(7));
    assert_eq!(eval("min(1, 7, 3)"), Value::Int(1));
    // An all-int input stays int even when compared as floats.
    assert_eq!(eval("max(1, 2.5, 2)"), Value::Float(2.5));
}

#[test]
fn test_max_min_over_a_list() {
    assert_eq!(eval_in("max(xs)", json!({"xs": [4, 9, 2]})), Value::Int(9));
    assert_eq!(eval_in("min(xs)", json!({"xs": [4, 9, 2]})), Value::Int(2));
}

#[test]
fn test_max_of_nothing_is_an_error() {
    assert_eq!(eval_err("max()").kind, ErrorKind::Runtime);
}

#[test]
fn test_sqrt_exp_logs() {
    assert_eq!(eval("sqrt(9)"), Value::Float(3.0));
    assert_eq!(eval("exp(0)"), Value::Float(1.0));
    assert_eq!(eval("ln(1)"), Value::Float(0.0));
    assert_eq!(eval("log10(1000)"), Value::Float(3.0));
    assert_eq!(eval("log(8, 2)"), Value::Float(3.0));
}

#[test]
fn test_log_domain_errors() {
    assert_eq!(eval_err("sqrt(-1)").kind, ErrorKind::Runtime);
    assert_eq!(eval_err("ln(0)").kind, ErrorKind::Runtime);
    assert_eq!(eval_err("log(8, 1)").kind, ErrorKind::Runtime);
    assert_eq!(eval_err("log10(-5)").kind, ErrorKind::Runtime);
}

#[test]
fn test_sum() {
    assert_eq!(eval("sum(1, 2, 3)"), Value::Int(6));
    assert_eq!(eval_in("sum(xs)", json!({"xs": [1, 2, 3.5]})), Value::Float(6.5));
    assert_eq!(eval_in("sum(xs)", json!({"xs": []})), Value::Int(0));
}

#[test]
fn test_sum_pairs_with_computed_spread() {
    assert_eq!(
        eval_in(
            "sum(orders[*].(qty * price))",
            json!({"orders": [{"qty": 2, "price": 10}, {"qty": 1, "price": 25}]})
        ),
        Value::Int(45)
    );
}

#[test]
fn test_avg() {
    assert_eq!(eval("avg(1, 2, 3)"), Value::Float(2.0));
    assert_eq!(eval_in("avg(xs)", json!({"xs": [2, 4]})), Value::Float(3.0));
    assert_eq!(eval_err("avg()").kind, ErrorKind::Runtime);
}

#[test]
fn test_non_numeric_input_is_an_error() {
    assert_eq!(eval_err("sum(1, 'x')").kind, ErrorKind::Runtime);
    assert_eq!(eval_err("sqrt('x')").kind, ErrorKind::Runtime);
}
