//! Interned struct keys.

use core::fmt;
use std::sync::OnceLock;

use lasso::{Spur, ThreadedRodeo};

fn interner() -> &'static ThreadedRodeo {
    static INTERNER: OnceLock<ThreadedRodeo> = OnceLock::new();
    INTERNER.get_or_init(ThreadedRodeo::new)
}

/// An interned struct key.
///
/// Symbols are cheap to copy and compare. The intern pool is process-wide
/// and append-only, which is why there are two ways in:
///
/// - [`Symbol::intern`] inserts the name if it is new. Host code uses this
///   when constructing struct values.
/// - [`Symbol::lookup`] only resolves names that some host already interned.
///   Expression evaluation uses this exclusively, so user expressions can
///   probe arbitrary names without growing the pool.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(Spur);

impl Symbol {
    /// Intern `name`, minting a new symbol if necessary.
    pub fn intern(name: &str) -> Self {
        Symbol(interner().get_or_intern(name))
    }

    /// Resolve `name` to an existing symbol. Never mints.
    pub fn lookup(name: &str) -> Option<Self> {
        interner().get(name).map(Symbol)
    }

    /// The interned string.
    pub fn as_str(self) -> &'static str {
        interner().resolve(&self.0)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
