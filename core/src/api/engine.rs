//! Engine entry points.
//!
//! Three operations, in two flavors each:
//!
//! - [`eval`]: compile (through the cache) and apply to a scope.
//! - [`compile`]: produce a reusable [`CompiledExpr`].
//! - [`validate`]: compile and discard, reporting only success.
//!
//! The free functions run against the shipped default registry; the same
//! trio exists as methods on [`Registry`] for custom function sets. Each
//! operation also has a `*_or_panic` variant that panics on failure instead
//! of returning an error, for call sites where a bad expression is a bug.

use crate::cache;
use crate::compiler::{self, CompiledExpr};
use crate::parser;
use crate::registry::{default_registry, Registry};
use crate::values::Value;

use super::Error;

/// Evaluate an expression against a scope with the default registry.
///
/// # Example
///
/// ```
/// use reckon_core::{eval, Value};
/// use serde_json::json;
///
/// let scope = Value::from(json!({"price": 25.0, "quantity": 4}));
/// let result = eval("price * quantity", &scope).unwrap();
/// assert_eq!(result, Value::Float(100.0));
/// ```
pub fn eval(source: &str, scope: &Value) -> Result<Value, Error> {
    default_registry().eval(source, scope)
}

/// Compile an expression with the default registry.
///
/// The returned artifact is immutable and `Send + Sync`: hold it, share it,
/// and apply it concurrently with different scopes.
pub fn compile(source: &str) -> Result<CompiledExpr, Error> {
    default_registry().compile(source)
}

/// Check that an expression parses and compiles with the default registry.
pub fn validate(source: &str) -> Result<(), Error> {
    default_registry().validate(source)
}

/// Like [`eval`], but panics on failure.
pub fn eval_or_panic(source: &str, scope: &Value) -> Value {
    match eval(source, scope) {
        Ok(value) => value,
        Err(err) => panic!("{err}"),
    }
}

/// Like [`compile`], but panics on failure.
pub fn compile_or_panic(source: &str) -> CompiledExpr {
    match compile(source) {
        Ok(compiled) => compiled,
        Err(err) => panic!("{err}"),
    }
}

/// Like [`validate`], but panics on failure.
pub fn validate_or_panic(source: &str) {
    if let Err(err) = validate(source) {
        panic!("{err}");
    }
}

impl Registry {
    /// Evaluate an expression against a scope with this registry.
    pub fn eval(&self, source: &str, scope: &Value) -> Result<Value, Error> {
        self.compile(source)?.apply(scope)
    }

    /// Compile an expression with this registry, going through the
    /// compilation cache when this registry has it enabled.
    ///
    /// Failed compilations are never cached, so fixing a registry (say,
    /// adding a missing plugin under a new registry) and retrying works.
    pub fn compile(&self, source: &str) -> Result<CompiledExpr, Error> {
        if let Some(hit) = cache::get(self, source) {
            return Ok(hit);
        }
        let parsed = parser::parse(source)?;
        let compiled = compiler::compile(&parsed, self)?;
        cache::put(self, source, compiled.clone());
        Ok(compiled)
    }

    /// Check that an expression parses and compiles with this registry.
    ///
    /// Side-effect-free except for populating the compilation cache.
    pub fn validate(&self, source: &str) -> Result<(), Error> {
        self.compile(source).map(|_| ())
    }

    /// Like [`Registry::eval`], but panics on failure.
    pub fn eval_or_panic(&self, source: &str, scope: &Value) -> Value {
        match self.eval(source, scope) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`Registry::compile`], but panics on failure.
    pub fn compile_or_panic(&self, source: &str) -> CompiledExpr {
        match self.compile(source) {
            Ok(compiled) => compiled,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`Registry::validate`], but panics on failure.
    pub fn validate_or_panic(&self, source: &str) {
        if let Err(err) = self.validate(source) {
            panic!("{err}");
        }
    }
}
