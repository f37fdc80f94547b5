//! Public error type.
//!
//! Internal stage errors (parse, compile, runtime) are converted into this
//! one stable type at the API boundary. Failures are classified strictly by
//! the stage that detected them; there are exactly three kinds.

use core::fmt;

use crate::compiler::CompileError;
use crate::evaluator::RuntimeError;
use crate::parser::ParseError;

/// Which stage detected the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parser,
    Compiler,
    Runtime,
}

impl ErrorKind {
    fn prefix(self) -> &'static str {
        match self {
            ErrorKind::Parser => "Parse error",
            ErrorKind::Compiler => "Compilation error",
            ErrorKind::Runtime => "Runtime error",
        }
    }
}

/// Public error for all engine operations.
///
/// Renders as `"{prefix} at line N, column M: {message}"`, with the
/// location present only when the failing stage tracked one (the parser
/// always does; later stages do not).
#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    /// 1-based line, when the stage tracked a location.
    pub line: Option<u32>,
    /// 1-based column, when the stage tracked a location.
    pub column: Option<u32>,
    /// The originating stage error, when one exists.
    pub details: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.prefix())?;
        if let (Some(line), Some(column)) = (self.line, self.column) {
            write!(f, " at line {}, column {}", line, column)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.details
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        let message = if err.snippet.is_empty() {
            err.kind.to_string()
        } else {
            format!("{} (near `{}`)", err.kind, err.snippet)
        };
        Error {
            kind: ErrorKind::Parser,
            message,
            line: Some(err.line),
            column: Some(err.column),
            details: Some(Box::new(err)),
        }
    }
}

impl From<CompileError> for Error {
    fn from(err: CompileError) -> Self {
        Error {
            kind: ErrorKind::Compiler,
            message: err.to_string(),
            line: None,
            column: None,
            details: Some(Box::new(err)),
        }
    }
}

impl From<RuntimeError> for Error {
    fn from(err: RuntimeError) -> Self {
        Error {
            kind: ErrorKind::Runtime,
            message: err.to_string(),
            line: None,
            column: None,
            details: Some(Box::new(err)),
        }
    }
}
