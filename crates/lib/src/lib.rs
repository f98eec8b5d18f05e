//!
//! Gumpkit: observable containers and bidirectional relation maps.
//!
//! ## Core Concepts
//!
//! * **Events (`events::EventManager`)**: Per-object listener registries. Every container owns one and
//!   stamps its events with its `SourceId`.
//! * **Paths (`gump::GumpPath`)**: Immutable key sequences addressing locations in nested containers.
//! * **GumpMap (`gump::GumpMap`)**: An arbitrarily deep multi-map. Leaves are `GumpSet`s, and every change
//!   anywhere in the tree bubbles up to the root as an event carrying the full path.
//! * **Tolkien maps (`tolkien::TolkienMap`)**: Bidirectional relations between two key spaces with 1:1, 1:N
//!   or M:N cardinality, kept consistent in both directions and chainable with `tolkien::compose`.
//! * **Cloner (`cloner::Cloner`)**: Deep copies of dynamic value graphs that preserve shared references
//!   and cycles.

use std::{fmt::Debug, hash::Hash};

pub mod cloner;
pub mod events;
pub mod gump;
pub mod tolkien;

pub use gump::{GumpMap, GumpPath, GumpSet};

/// Bound shared by every key and value stored in the containers.
///
/// Implemented for every type that qualifies.
pub trait Element: Clone + Eq + Hash + Debug + 'static {}

impl<T: Clone + Eq + Hash + Debug + 'static> Element for T {}

/// Result type used throughout the Gumpkit library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Gumpkit library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured container errors from the gump module
    #[error(transparent)]
    Gump(gump::GumpError),

    /// Structured deep-copy errors from the cloner module
    #[error(transparent)]
    Cloner(cloner::ClonerError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Gump(_) => "gump",
            Error::Cloner(_) => "cloner",
        }
    }

    /// Check if this error is a container kind mismatch.
    pub fn is_type_error(&self) -> bool {
        match self {
            Error::Gump(gump_err) => gump_err.is_type_error(),
            _ => false,
        }
    }

    /// Check if this error indicates a conflict (key already taken).
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Gump(gump_err) => gump_err.is_occupied(),
            _ => false,
        }
    }

    /// Check if this error reports a map wired in beneath itself.
    pub fn is_cycle(&self) -> bool {
        match self {
            Error::Gump(gump_err) => gump_err.is_cycle(),
            _ => false,
        }
    }

    /// Check if this error is cloner-related.
    pub fn is_cloner_error(&self) -> bool {
        matches!(self, Error::Cloner(_))
    }

    /// Check if this error reports a value that cannot be cloned.
    pub fn is_unsupported(&self) -> bool {
        match self {
            Error::Cloner(cloner_err) => cloner_err.is_unsupported(),
            _ => false,
        }
    }
}
