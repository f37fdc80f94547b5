//! Reckon: an embeddable expression evaluation engine.
//!
//! Reckon evaluates spreadsheet-style / C-like formulas (`price * qty *
//! (1 + tax)`, `orders[*].(qty * price)`, `abs(-10)`) against a structured
//! *scope* value. Expressions are compiled once into a reusable, thread-safe
//! artifact and applied many times against different scopes; compilation is
//! amortized through a per-registry LRU cache.
//!
//! ## Pipeline
//!
//! ```text
//! source ──▶ parser ──▶ IR ──▶ compiler ──▶ CompiledExpr
//!                                               │
//!                     scope ──────────────────▶ apply ──▶ Value | Error
//! ```
//!
//! ## Example
//!
//! ```
//! use reckon_core::{eval, Value};
//! use serde_json::json;
//!
//! let scope = Value::from(json!({"price": 25.0, "quantity": 4}));
//! let total = eval("price * quantity", &scope).unwrap();
//! assert_eq!(total, Value::Float(100.0));
//! ```

pub mod api;
pub mod cache;
pub mod compiler;
pub mod evaluator;
pub mod parser;
pub mod registry;
pub mod stdlib;
pub mod values;

pub use api::{
    compile, compile_or_panic, eval, eval_or_panic, validate, validate_or_panic, Error, ErrorKind,
};
pub use compiler::CompiledExpr;
pub use evaluator::RuntimeError;
pub use registry::{default_registry, Arity, Function, NativeFunction, Registry, RegistryBuilder};
pub use values::{Symbol, Value};
