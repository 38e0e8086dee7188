//! Error taxonomy, per spec.md §7.

use std::fmt;

/// Opaque stand-in for a dtype key in error messages (a layout string or a
/// registered type name), without pulling `DtypeKey` into this module.
#[derive(Debug, Clone)]
pub struct KeyDisplay(pub String);

impl fmt::Display for KeyDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ArrexError {
    #[error("no dtype registered for key {0}")]
    UnknownDtype(KeyDisplay),

    #[error("invalid layout string {0:?}: {1}")]
    Layout(String, String),

    #[error("{0}")]
    Type(String),

    #[error("{0}")]
    Size(String),

    #[error("index {index} out of range for length {len}")]
    Index { index: isize, len: usize },

    #[error("{0}")]
    Invariant(String),

    #[error("{0}")]
    NotSupported(String),

    #[error("allocation failed requesting {requested} bytes")]
    Allocation { requested: usize },
}

pub type Result<T> = std::result::Result<T, ArrexError>;
