//! Error Module - Runtime Error Types
//!
//! Every failure raised while binding arguments, dispatching, or coercing
//! values surfaces as a [`RunError`]. Each variant carries a kind and a
//! human-readable message and is returned to the caller, never swallowed.
//!
//! # Error Categories
//!
//! - `Arity` - wrong number of arguments for a method or lambda
//! - `TypeMismatch` - a value failed a required coercion
//! - `Lookup` - an OS database had no entry for a name
//! - `NoMethod` - dispatch found no method for the message
//! - `Argument` - an argument has an unacceptable value
//! - `Os` - a system call failed with errno
//!
//! Out-of-bounds access on [`Args`](crate::args::Args) is not represented
//! here: it is a caller-side contract violation and panics.

use std::fmt;
use thiserror::Error;

/// Expected argument count carried by [`RunError::Arity`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedArity {
    /// Exactly `n`
    Exact(usize),
    /// Between `lo` and `hi`, inclusive
    Range(usize, usize),
    /// `n` or more
    AtLeast(usize),
}

impl fmt::Display for ExpectedArity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{}", n),
            Self::Range(lo, hi) => write!(f, "{}..{}", lo, hi),
            Self::AtLeast(n) => write!(f, "{}+", n),
        }
    }
}

/// Category of a [`RunError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ArityError,
    TypeMismatchError,
    LookupFailure,
    NoMethodError,
    ArgumentError,
    SystemCallError,
}

/// Main error type for runtime operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunError {
    /// Wrong number of arguments
    #[error("wrong number of arguments (given {given}, expected {expected})")]
    Arity {
        given: usize,
        expected: ExpectedArity,
    },

    /// A value failed a required shape or type coercion
    #[error("{0}")]
    TypeMismatch(String),

    /// An OS database lookup found nothing for the given name
    #[error("{0}")]
    Lookup(String),

    /// No method for the message on the receiver
    #[error("undefined method '{name}' for an instance of {class}")]
    NoMethod { name: String, class: String },

    /// An argument has an unacceptable value
    #[error("{0}")]
    Argument(String),

    /// A system call failed
    #[error("{0}")]
    Os(String),
}

impl RunError {
    /// Shorthand for an arity failure
    pub fn arity(given: usize, expected: ExpectedArity) -> Self {
        Self::Arity { given, expected }
    }

    /// Shorthand for an implicit-conversion failure
    pub fn no_implicit_conversion(from: &str, into: &str) -> Self {
        Self::TypeMismatch(format!("no implicit conversion of {} into {}", from, into))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Arity { .. } => ErrorKind::ArityError,
            Self::TypeMismatch(_) => ErrorKind::TypeMismatchError,
            Self::Lookup(_) => ErrorKind::LookupFailure,
            Self::NoMethod { .. } => ErrorKind::NoMethodError,
            Self::Argument(_) => ErrorKind::ArgumentError,
            Self::Os(_) => ErrorKind::SystemCallError,
        }
    }

    /// Name of the exception class the host language reports
    pub fn class_name(&self) -> &'static str {
        match self.kind() {
            ErrorKind::ArityError | ErrorKind::LookupFailure | ErrorKind::ArgumentError => {
                "ArgumentError"
            }
            ErrorKind::TypeMismatchError => "TypeError",
            ErrorKind::NoMethodError => "NoMethodError",
            ErrorKind::SystemCallError => "SystemCallError",
        }
    }

    /// Human-readable message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Result type alias using RunError
pub type RunResult<T> = std::result::Result<T, RunError>;

/// Errors raised while loading a [`RuntimeConfig`](crate::config::RuntimeConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration text is not valid TOML for this schema
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
