//! Scope and container access.
//!
//! Two regimes share the lookup primitives here:
//!
//! - *Strict* access (`get_var`, `access_name`, `access_value`): a miss is a
//!   runtime error. Used for top-level variables and explicit `.`/`[]`
//!   accessors.
//! - *Forgiving* access (`walk_path`): a miss yields `Null`. Used inside
//!   spread tails, so aggregates over ragged data stay total.
//!
//! A miss is represented as `Option::None` throughout. `None` is distinct
//! from every user-constructible [`Value`], so user data that happens to
//! equal some well-known "missing" string can never be mistaken for a miss.

use crate::values::{Symbol, Value};

use super::error::RuntimeError;

/// Resolve a variable against the scope.
///
/// Maps are probed with the name as a string key. Structs resolve the name
/// through the symbol table first, and only to symbols that already exist,
/// so expressions cannot grow the intern pool by probing names.
pub(crate) fn get_var(scope: &Value, name: &str) -> Result<Value, RuntimeError> {
    let found = match scope {
        Value::Map(map) => map.get(name).cloned(),
        Value::Struct(fields) => {
            Symbol::lookup(name).and_then(|sym| fields.get(&sym).cloned())
        }
        _ => None,
    };
    found.ok_or_else(|| RuntimeError::VariableNotFound {
        name: name.to_string(),
    })
}

/// Dot access: `target.name`.
pub(crate) fn access_name(target: &Value, name: &str) -> Result<Value, RuntimeError> {
    match target {
        Value::Map(map) => map.get(name).cloned().ok_or(RuntimeError::KeyNotFound),
        Value::Struct(fields) => Symbol::lookup(name)
            .and_then(|sym| fields.get(&sym).cloned())
            .ok_or(RuntimeError::KeyNotFound),
        other => Err(RuntimeError::CannotAccess {
            container: other.kind(),
            key: "string",
        }),
    }
}

/// Bracket access: `target[key]` with an evaluated key.
pub(crate) fn access_value(target: &Value, key: &Value) -> Result<Value, RuntimeError> {
    match (target, key) {
        (Value::List(items), Value::Int(index)) => index_list(items, *index),
        (Value::Map(_), Value::String(name)) | (Value::Struct(_), Value::String(name)) => {
            access_name(target, name)
        }
        (container, key) => Err(RuntimeError::CannotAccess {
            container: container.kind(),
            key: key.kind(),
        }),
    }
}

fn index_list(items: &[Value], index: i64) -> Result<Value, RuntimeError> {
    usize::try_from(index)
        .ok()
        .and_then(|i| items.get(i).cloned())
        .ok_or(RuntimeError::IndexOutOfBounds {
            index,
            len: items.len(),
        })
}

/// A spread-tail step with its index expression already evaluated.
pub(crate) enum ResolvedStep {
    Key(String),
    Index(Value),
}

/// Apply a spread tail to one element. Misses and shape mismatches yield
/// `Null` instead of an error.
pub(crate) fn walk_path(element: &Value, steps: &[ResolvedStep]) -> Value {
    let mut current = element.clone();
    for step in steps {
        current = match (&current, step) {
            (Value::Map(map), ResolvedStep::Key(name)) => {
                map.get(name.as_str()).cloned().unwrap_or(Value::Null)
            }
            (Value::Struct(fields), ResolvedStep::Key(name)) => Symbol::lookup(name)
                .and_then(|sym| fields.get(&sym).cloned())
                .unwrap_or(Value::Null),
            (Value::List(items), ResolvedStep::Index(Value::Int(index))) => {
                usize::try_from(*index)
                    .ok()
                    .and_then(|i| items.get(i).cloned())
                    .unwrap_or(Value::Null)
            }
            _ => Value::Null,
        };
    }
    current
}
