//! Observable path-addressable containers.
//!
//! - [`GumpPath`]: an immutable key sequence addressing a location
//! - [`GumpSet`]: an observable leaf set
//! - [`GumpMap`]: an observable tree of maps with sets at the leaves, whose
//!   events bubble up to the root with full paths

pub mod errors;
pub mod map;
pub mod path;
pub mod set;

pub use errors::GumpError;
pub use map::{Change, GumpMap, GumpNode, MapEvent, NodeKind, ResolveOptions, Resolved};
pub use path::{DEFAULT_SEPARATOR, GumpPath, ToGumpPath};
pub use set::{GumpSet, SetChange};
