//! Error types for path-addressed container operations.
//!
//! Every error here is raised before the container is touched, so a failed
//! call leaves the map exactly as it was.

use thiserror::Error;

use super::NodeKind;

/// Structured error types for [`GumpMap`](super::GumpMap) operations.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GumpError {
    /// A path ran into the wrong container kind
    #[error("Type mismatch at '{path}': expected a {expected}, found a {found}")]
    TypeMismatch {
        path: String,
        expected: NodeKind,
        found: NodeKind,
    },

    /// A container was wired in under a key that already holds one
    #[error("Key at '{path}' already holds a {found}")]
    Occupied { path: String, found: NodeKind },

    /// A map was wired in beneath itself
    #[error("Wiring the map in at '{path}' would make it contain itself")]
    Cycle { path: String },
}

impl GumpError {
    /// Check if this error is a container kind mismatch
    pub fn is_type_error(&self) -> bool {
        matches!(self, GumpError::TypeMismatch { .. })
    }

    /// Check if this error reports an occupied key
    pub fn is_occupied(&self) -> bool {
        matches!(self, GumpError::Occupied { .. })
    }

    /// Check if this error reports a map wired in beneath itself
    pub fn is_cycle(&self) -> bool {
        matches!(self, GumpError::Cycle { .. })
    }

    /// Get the path at which the error was raised
    pub fn path(&self) -> &str {
        match self {
            GumpError::TypeMismatch { path, .. }
            | GumpError::Occupied { path, .. }
            | GumpError::Cycle { path } => path,
        }
    }

    /// Get the kind of container that was found at the failing path, if any
    pub fn found(&self) -> Option<NodeKind> {
        match self {
            GumpError::TypeMismatch { found, .. } | GumpError::Occupied { found, .. } => {
                Some(*found)
            }
            GumpError::Cycle { .. } => None,
        }
    }
}

// Conversion from GumpError to the main Error type
impl From<GumpError> for crate::Error {
    fn from(err: GumpError) -> Self {
        crate::Error::Gump(err)
    }
}
