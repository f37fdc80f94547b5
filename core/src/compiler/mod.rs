//! Compilation of parsed expressions.
//!
//! The compiler turns IR into a [`CompiledExpr`]: an immutable,
//! thread-shareable artifact that applies to a scope. Compiling validates
//! everything that does not depend on the scope (function resolution and
//! fixed arities), so a successfully compiled expression can only fail at
//! runtime for data-dependent reasons.

mod compile;
mod error;


pub use compile::{compile, CompiledExpr};
pub use error::CompileError;
