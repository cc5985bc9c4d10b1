//! Error types for query string decoding.

use thiserror::Error;

/// Errors that can occur while decoding a query string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A `%` was not followed by two hexadecimal digits.
    #[error("invalid percent-encoding '{sequence}' in query string")]
    InvalidEscape {
        /// The offending escape sequence (up to three bytes).
        sequence: String,
    },

    /// The percent-decoded bytes of a key or value are not UTF-8.
    #[error("percent-decoded query component is not valid UTF-8: '{component}'")]
    InvalidUtf8 {
        /// The raw (still encoded) component.
        component: String,
    },

    /// A key already holds a value of a different shape than its suffix requires.
    #[error("expected {expected} for key '{key}', but found {found}")]
    TypeMismatch {
        /// The key whose existing value has the wrong shape.
        key: String,
        /// The shape the key suffix asked for.
        expected: &'static str,
        /// The shape actually stored.
        found: &'static str,
    },
}

impl QueryError {
    /// Creates an `InvalidEscape` error.
    pub fn invalid_escape(sequence: impl Into<String>) -> Self {
        Self::InvalidEscape {
            sequence: sequence.into(),
        }
    }

    /// Creates an `InvalidUtf8` error.
    pub fn invalid_utf8(component: impl Into<String>) -> Self {
        Self::InvalidUtf8 {
            component: component.into(),
        }
    }

    /// Creates a `TypeMismatch` error.
    pub fn type_mismatch(key: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            expected,
            found,
        }
    }

    /// Returns true for malformed percent-encoding (as opposed to a shape conflict).
    #[must_use]
    pub fn is_escape_error(&self) -> bool {
        matches!(self, Self::InvalidEscape { .. } | Self::InvalidUtf8 { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_invalid_escape_display() {
        let msg = QueryError::invalid_escape("%zz").to_string();
        assert!(msg.contains("%zz"), "Expected sequence in: {msg}");
        assert!(msg.contains("percent-encoding"));
    }

    #[test]
    fn test_query_error_type_mismatch_display() {
        let msg = QueryError::type_mismatch("formats", "sequence", "scalar").to_string();
        assert!(msg.contains("'formats'"));
        assert!(msg.contains("expected sequence"));
        assert!(msg.contains("found scalar"));
    }

    #[test]
    fn test_query_error_is_escape_error() {
        assert!(QueryError::invalid_escape("%").is_escape_error());
        assert!(QueryError::invalid_utf8("%ff").is_escape_error());
        assert!(!QueryError::type_mismatch("a", "tree", "scalar").is_escape_error());
    }
}
