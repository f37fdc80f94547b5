//! Runtime evaluation errors.
//!
//! Everything the compiler cannot rule out ahead of time surfaces here:
//! missing variables and keys, shape mismatches, arithmetic failures, and
//! plugin-reported errors.

use snafu::Snafu;

/// Runtime evaluation error.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum RuntimeError {
    #[snafu(display("variable not found: {name}"))]
    VariableNotFound { name: String },

    #[snafu(display("Access failed: key not found"))]
    KeyNotFound,

    #[snafu(display("index {index} out of bounds for list of length {len}"))]
    IndexOutOfBounds { index: i64, len: usize },

    #[snafu(display("cannot access {container} with {key} key"))]
    CannotAccess {
        container: &'static str,
        key: &'static str,
    },

    #[snafu(display("division by zero"))]
    DivisionByZero,

    #[snafu(display("'{op}' expects numeric operands, got {left} and {right}"))]
    NumericOperands {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    #[snafu(display("'{op}' expects a numeric operand, got {operand}"))]
    NumericOperand {
        op: &'static str,
        operand: &'static str,
    },

    #[snafu(display("'{op}' expects integer operands, got {left} and {right}"))]
    IntegerOperands {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    #[snafu(display("cannot order {left} and {right}"))]
    Incomparable {
        left: &'static str,
        right: &'static str,
    },

    #[snafu(display("integer overflow in '{op}'"))]
    IntegerOverflow { op: &'static str },

    #[snafu(display("shift amount out of range: {amount}"))]
    ShiftOutOfRange { amount: i64 },

    #[snafu(display("factorial expects a non-negative integer, got {actual}"))]
    FactorialOperand { actual: String },

    #[snafu(display("spread target must be a list, got {actual}"))]
    SpreadOnNonList { actual: &'static str },

    #[snafu(display("{name}: {message}"))]
    Function { name: String, message: String },

    #[snafu(display("{message}"))]
    Custom { message: String },
}

impl RuntimeError {
    /// Free-form runtime error, for plugins.
    pub fn custom(message: impl Into<String>) -> Self {
        RuntimeError::Custom {
            message: message.into(),
        }
    }

    /// Attribute an error to a named function. Engine errors raised inside a
    /// plugin pass through unchanged; anything else is wrapped with the
    /// plugin name.
    pub(crate) fn in_function(self, name: &str) -> Self {
        match self {
            RuntimeError::Custom { message } => RuntimeError::Function {
                name: name.to_string(),
                message,
            },
            other => other,
        }
    }
}
