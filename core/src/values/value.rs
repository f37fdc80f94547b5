//! The dynamic value type.

use core::fmt;
use std::sync::Arc;

use super::Symbol;

/// String-keyed map payload.
pub type Map = hashbrown::HashMap<String, Value>;

/// Symbol-keyed struct payload.
pub type StructMap = hashbrown::HashMap<Symbol, Value>;

/// A runtime value.
///
/// `Int` and `Float` are fully inline. `String`, `List`, `Map` and `Struct`
/// share their payload through `Arc`, so cloning is cheap and values can be
/// held by concurrently-invoked compiled expressions.
///
/// Equality is structural; `Int` and `Float` compare numerically
/// (`Value::Int(1) == Value::Float(1.0)`). Values of different non-numeric
/// kinds are never equal.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Arc<str>),
    List(Arc<Vec<Value>>),
    Map(Arc<Map>),
    Struct(Arc<StructMap>),
}

impl Value {
    /// Truthiness: only `Null` and `false` are falsy. `0`, `""`, `[]` and
    /// `{}` are all truthy.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    /// Kind name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Struct(_) => "struct",
        }
    }

    /// Numeric view with `Int → Float` coercion. `None` for non-numbers.
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Build a string value.
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Arc::from(s.as_ref()))
    }

    /// Build a list value.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(Arc::new(items.into_iter().collect()))
    }

    /// Build a map value from string keys.
    pub fn map(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        Value::Map(Arc::new(entries.into_iter().collect()))
    }

    /// Start building a struct value with interned keys.
    pub fn struct_builder() -> StructBuilder {
        StructBuilder {
            fields: StructMap::new(),
        }
    }
}

/// Builder for [`Value::Struct`] values.
///
/// Interning happens here, on the host side: expressions can only resolve
/// keys that some builder (or other host code) already minted.
///
/// # Example
///
/// ```
/// use reckon_core::Value;
///
/// let user = Value::struct_builder()
///     .field("name", Value::string("ada"))
///     .field("age", Value::Int(36))
///     .build();
/// ```
pub struct StructBuilder {
    fields: StructMap,
}

impl StructBuilder {
    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(Symbol::intern(name), value.into());
        self
    }

    pub fn build(self) -> Value {
        Value::Struct(Arc::new(self.fields))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) => (*a as f64) == *b,
            (Value::Float(a), Value::Int(b)) => *a == (*b as f64),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Struct(a), Value::Struct(b)) => a == b,
            _ => false,
        }
    }
}

/// Format a float the way string-producing builtins render it: whole values
/// without a fractional part, everything else via the shortest roundtrip
/// representation.
pub(crate) fn format_f64(f: f64) -> String {
    if f.fract() == 0.0 && f.is_finite() {
        format!("{:.0}", f)
    } else {
        f.to_string()
    }
}

impl fmt::Display for Value {
    /// The `to_string` used by string-producing builtins. Strings render
    /// unquoted (`concat(x) == x` for string `x`); containers render as
    /// JSON.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => f.write_str(&format_f64(*x)),
            Value::String(s) => f.write_str(s),
            Value::List(_) | Value::Map(_) | Value::Struct(_) => {
                f.write_str(&serde_json::Value::from(self).to_string())
            }
        }
    }
}
