//! Error types for deep copies.

use thiserror::Error;

/// Structured error types for [`Cloner`](super::Cloner) operations.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClonerError {
    /// The value has no known deep-copy semantics
    #[error("Cannot clone value of type '{type_name}'")]
    Unsupported { type_name: String },

    /// A custom type refused to clone itself
    #[error("Custom clone of '{type_name}' failed: {reason}")]
    CustomFailed { type_name: String, reason: String },
}

impl ClonerError {
    /// Check if this error reports an unsupported value
    pub fn is_unsupported(&self) -> bool {
        matches!(self, ClonerError::Unsupported { .. })
    }

    /// Check if this error was raised by a custom clone implementation
    pub fn is_custom_failure(&self) -> bool {
        matches!(self, ClonerError::CustomFailed { .. })
    }

    /// Get the name of the type that could not be cloned
    pub fn type_name(&self) -> &str {
        match self {
            ClonerError::Unsupported { type_name }
            | ClonerError::CustomFailed { type_name, .. } => type_name,
        }
    }
}

// Conversion from ClonerError to the main Error type
impl From<ClonerError> for crate::Error {
    fn from(err: ClonerError) -> Self {
        crate::Error::Cloner(err)
    }
}
