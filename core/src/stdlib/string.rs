//! String builtins.
//!
//! Functions: len, left, right, substring, upper, lower, trim, concat,
//! textjoin, replace, find, contains, normalize.
//!
//! Positions and lengths are in characters, not bytes. `find` is 0-based
//! and returns -1 on a miss.

use crate::evaluator::RuntimeError;
use crate::registry::{Arity, FunctionTable};
use crate::values::Value;

use super::{arg_range, fail, integer, register, text};

pub(crate) fn install(table: &mut FunctionTable) {
    register(table, "len", Arity::Fixed(1), str_len);
    register(table, "left", Arity::Fixed(2), str_left);
    register(table, "right", Arity::Fixed(2), str_right);
    register(table, "substring", Arity::Any, str_substring);
    register(table, "upper", Arity::Fixed(1), str_upper);
    register(table, "lower", Arity::Fixed(1), str_lower);
    register(table, "trim", Arity::Fixed(1), str_trim);
    register(table, "concat", Arity::Any, str_concat);
    register(table, "textjoin", Arity::Any, str_textjoin);
    register(table, "replace", Arity::Fixed(3), str_replace);
    register(table, "find", Arity::Fixed(2), str_find);
    register(table, "contains", Arity::Fixed(2), str_contains);
    register(table, "normalize", Arity::Fixed(1), str_normalize);
}

fn str_len(args: &[Value]) -> Result<Value, RuntimeError> {
    let len = match &args[0] {
        Value::String(s) => s.chars().count(),
        Value::List(items) => items.len(),
        Value::Map(map) => map.len(),
        Value::Struct(fields) => fields.len(),
        other => {
            return Err(fail(
                "len",
                format!("expects a string or collection, got {}", other.kind()),
            ))
        }
    };
    Ok(Value::Int(len as i64))
}

fn str_left(args: &[Value]) -> Result<Value, RuntimeError> {
    let s = text("left", &args[0])?;
    let n = non_negative("left", integer("left", &args[1])?)?;
    Ok(Value::string(s.chars().take(n).collect::<String>()))
}

fn str_right(args: &[Value]) -> Result<Value, RuntimeError> {
    let s = text("right", &args[0])?;
    let n = non_negative("right", integer("right", &args[1])?)?;
    let total = s.chars().count();
    let skip = total.saturating_sub(n);
    Ok(Value::string(s.chars().skip(skip).collect::<String>()))
}

fn str_substring(args: &[Value]) -> Result<Value, RuntimeError> {
    arg_range("substring", args, 2, 3)?;
    let s = text("substring", &args[0])?;
    let start = non_negative("substring", integer("substring", &args[1])?)?;
    let chars = s.chars().skip(start);
    let result: String = match args.get(2) {
        Some(len_arg) => {
            let len = non_negative("substring", integer("substring", len_arg)?)?;
            chars.take(len).collect()
        }
        None => chars.collect(),
    };
    Ok(Value::string(result))
}

fn str_upper(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::string(text("upper", &args[0])?.to_uppercase()))
}

fn str_lower(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::string(text("lower", &args[0])?.to_lowercase()))
}

fn str_trim(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::string(text("trim", &args[0])?.trim()))
}

fn str_concat(args: &[Value]) -> Result<Value, RuntimeError> {
    let mut out = String::new();
    for v in args {
        out.push_str(&v.to_string());
    }
    Ok(Value::string(out))
}

fn str_textjoin(args: &[Value]) -> Result<Value, RuntimeError> {
    if args.is_empty() {
        return Err(fail("textjoin", "expects a separator argument"));
    }
    let sep = text("textjoin", &args[0])?;
    let mut parts = Vec::new();
    for v in &args[1..] {
        // List arguments join element-wise, which pairs with spreads:
        // textjoin(", ", users[*].name).
        match v {
            Value::List(items) => parts.extend(items.iter().map(|item| item.to_string())),
            other => parts.push(other.to_string()),
        }
    }
    Ok(Value::string(parts.join(sep)))
}

fn str_replace(args: &[Value]) -> Result<Value, RuntimeError> {
    let s = text("replace", &args[0])?;
    let old = text("replace", &args[1])?;
    let new = text("replace", &args[2])?;
    if old.is_empty() {
        return Err(fail("replace", "search string must not be empty"));
    }
    Ok(Value::string(s.replace(old, new)))
}

fn str_find(args: &[Value]) -> Result<Value, RuntimeError> {
    let needle = text("find", &args[0])?;
    let hay = text("find", &args[1])?;
    match hay.find(needle) {
        Some(byte_idx) => Ok(Value::Int(hay[..byte_idx].chars().count() as i64)),
        None => Ok(Value::Int(-1)),
    }
}

fn str_contains(args: &[Value]) -> Result<Value, RuntimeError> {
    let s = text("contains", &args[0])?;
    let sub = text("contains", &args[1])?;
    Ok(Value::Bool(s.contains(sub)))
}

/// Downcase and replace spaces with underscores.
fn str_normalize(args: &[Value]) -> Result<Value, RuntimeError> {
    let s = text("normalize", &args[0])?;
    Ok(Value::string(s.to_lowercase().replace(' ', "_")))
}

fn non_negative(name: &str, n: i64) -> Result<usize, RuntimeError> {
    usize::try_from(n).map_err(|_| fail(name, format!("expects a non-negative count, got {}", n)))
}

#[cfg(test)]
#[path = "string_test.rs"]
mod string_test;
