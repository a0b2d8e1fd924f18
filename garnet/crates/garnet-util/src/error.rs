//! Core error types for garnet-util crate
//!
//! This module defines error types used throughout the util crate.

use thiserror::Error;

/// Error type for symbol interning operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    /// The raw name handed to the interner is not valid UTF-8
    #[error("invalid symbol name: {valid_up_to} valid bytes before an invalid UTF-8 sequence")]
    InvalidName { valid_up_to: usize },

    /// Symbol not present in the table
    #[error("symbol not interned: {0}")]
    NotFound(String),
}

/// Result type alias for symbol operations
pub type SymbolResult<T> = std::result::Result<T, SymbolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_name_display() {
        let err = SymbolError::InvalidName { valid_up_to: 3 };
        assert_eq!(
            err.to_string(),
            "invalid symbol name: 3 valid bytes before an invalid UTF-8 sequence"
        );
    }

    #[test]
    fn test_not_found_display() {
        let err = SymbolError::NotFound("missing".to_string());
        assert_eq!(err.to_string(), "symbol not interned: missing");
    }
}
