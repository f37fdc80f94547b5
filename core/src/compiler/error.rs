//! Compile-time semantic errors.

use snafu::Snafu;

/// Error raised while lowering IR against a registry.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum CompileError {
    #[snafu(display("unknown function: {name}"))]
    UnknownFunction { name: String },

    #[snafu(display("function {name} expects {expected} argument(s), got {actual}"))]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}
