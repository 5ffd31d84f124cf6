//! Core error types.

use thiserror::Error;

/// Errors produced while decoding documents or converting uniform values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The document is not valid JSON.
    ///
    /// `excerpt` holds up to ten characters starting at the failing offset,
    /// with line breaks removed.
    #[error("unexpected token near ...{excerpt}... while parsing json (line {line}, column {column})")]
    JsonSyntax {
        offset: usize,
        line: usize,
        column: usize,
        excerpt: String,
    },

    /// The document is valid JSON but does not have the expected shape.
    #[error("model validation error for field {field}: {reason}")]
    Validation { field: String, reason: String },

    /// A uniform value does not fit the type it is uploaded to.
    #[error("expected {expected}, found {found}")]
    ValueMismatch { expected: String, found: String },
}

impl CoreError {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::validation("meshes", "not found");
        assert_eq!(
            err.to_string(),
            "model validation error for field meshes: not found"
        );

        let err = CoreError::ValueMismatch {
            expected: "4 float values".into(),
            found: "3 values".into(),
        };
        assert_eq!(err.to_string(), "expected 4 float values, found 3 values");
    }
}
