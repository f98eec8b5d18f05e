//! Paths addressing locations inside nested [`GumpMap`](super::GumpMap)s.
//!
//! A [`GumpPath`] is an immutable ordered sequence of keys. The empty path
//! denotes "this container itself". Every transformation returns a new path.
//!
//! # Usage
//!
//! ```rust
//! use gumpkit::gump::GumpPath;
//!
//! let path = GumpPath::from_string("user.profile.name");
//! assert_eq!(path.len(), 3);
//! assert_eq!(path.head().map(String::as_str), Some("user"));
//! assert_eq!(path.tail().to_string(), "profile.name");
//!
//! let deeper = path.append("first".to_string());
//! assert_eq!(deeper.to_string(), "user.profile.name.first");
//! ```
//!
//! Parsing never yields the empty path: `GumpPath::from_string("")` is a path
//! with one blank key. The empty path is only built explicitly with
//! [`GumpPath::empty`] or from an empty key sequence.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Separator used by [`GumpPath::from_string`].
pub const DEFAULT_SEPARATOR: &str = ".";

/// An ordered sequence of keys identifying a location in a nested structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GumpPath<K> {
    keys: Vec<K>,
}

impl<K> GumpPath<K> {
    /// Creates a path from a sequence of keys.
    pub fn new(keys: impl IntoIterator<Item = K>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// The zero-length path.
    pub fn empty() -> Self {
        Self { keys: Vec::new() }
    }

    /// A path consisting of exactly one key.
    pub fn single(key: K) -> Self {
        Self { keys: vec![key] }
    }

    /// Number of keys in this path.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` for the zero-length path.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The first key.
    pub fn head(&self) -> Option<&K> {
        self.keys.first()
    }

    /// The last key.
    pub fn last(&self) -> Option<&K> {
        self.keys.last()
    }

    /// The key at `index`.
    pub fn key_at(&self, index: usize) -> Option<&K> {
        self.keys.get(index)
    }

    /// All keys as a slice.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Iterates over the keys.
    pub fn iter(&self) -> std::slice::Iter<'_, K> {
        self.keys.iter()
    }

    /// Consumes the path, returning its keys.
    pub fn into_keys(self) -> Vec<K> {
        self.keys
    }
}

impl<K: Clone> GumpPath<K> {
    /// Everything but the first key.
    pub fn tail(&self) -> Self {
        Self::new(self.keys.iter().skip(1).cloned())
    }

    /// Everything but the last key.
    pub fn init(&self) -> Self {
        let end = self.keys.len().saturating_sub(1);
        Self::new(self.keys[..end].iter().cloned())
    }

    /// Splits the path into its first key and the remaining path.
    pub fn split_first(&self) -> Option<(&K, Self)> {
        self.head().map(|key| (key, self.tail()))
    }

    /// A new path with `key` added at the end.
    pub fn append(&self, key: K) -> Self {
        let mut keys = self.keys.clone();
        keys.push(key);
        Self { keys }
    }

    /// A new path with `key` added at the front.
    pub fn prepend(&self, key: K) -> Self {
        let mut keys = Vec::with_capacity(self.keys.len() + 1);
        keys.push(key);
        keys.extend(self.keys.iter().cloned());
        Self { keys }
    }

    /// A new path with `key` inserted before position `index`.
    ///
    /// Indices past the end append.
    pub fn insert_at(&self, index: usize, key: K) -> Self {
        let mut keys = self.keys.clone();
        keys.insert(index.min(keys.len()), key);
        Self { keys }
    }

    /// A new path made of this path followed by `other`.
    pub fn concat(&self, other: &GumpPath<K>) -> Self {
        Self::new(self.keys.iter().chain(other.keys.iter()).cloned())
    }
}

impl GumpPath<String> {
    /// Parses a path by splitting `s` on [`DEFAULT_SEPARATOR`].
    pub fn from_string(s: &str) -> Self {
        Self::from_string_with(s, DEFAULT_SEPARATOR)
    }

    /// Parses a path by splitting `s` on `separator`.
    ///
    /// An empty string yields a path with a single empty key.
    pub fn from_string_with(s: &str, separator: &str) -> Self {
        Self::new(s.split(separator).map(str::to_string))
    }
}

impl<K> Default for GumpPath<K> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K: fmt::Display> fmt::Display for GumpPath<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(DEFAULT_SEPARATOR)?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

impl FromStr for GumpPath<String> {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_string(s))
    }
}

impl<K> From<Vec<K>> for GumpPath<K> {
    fn from(keys: Vec<K>) -> Self {
        Self { keys }
    }
}

impl<K> FromIterator<K> for GumpPath<K> {
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl<K> IntoIterator for GumpPath<K> {
    type Item = K;
    type IntoIter = std::vec::IntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter()
    }
}

impl<'a, K> IntoIterator for &'a GumpPath<K> {
    type Item = &'a K;
    type IntoIter = std::slice::Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

/// Normalises values into a [`GumpPath`].
///
/// A path is used unchanged, a string is parsed with [`GumpPath::from_string`]
/// and a scalar key becomes a single-key path.
pub trait ToGumpPath<K> {
    /// Converts `self` into a path.
    fn to_gump_path(self) -> GumpPath<K>;
}

impl<K> ToGumpPath<K> for GumpPath<K> {
    fn to_gump_path(self) -> GumpPath<K> {
        self
    }
}

impl<K: Clone> ToGumpPath<K> for &GumpPath<K> {
    fn to_gump_path(self) -> GumpPath<K> {
        self.clone()
    }
}

impl<K> ToGumpPath<K> for Vec<K> {
    fn to_gump_path(self) -> GumpPath<K> {
        GumpPath::from(self)
    }
}

impl<K, const N: usize> ToGumpPath<K> for [K; N] {
    fn to_gump_path(self) -> GumpPath<K> {
        GumpPath::new(self)
    }
}

impl<K: Clone> ToGumpPath<K> for &[K] {
    fn to_gump_path(self) -> GumpPath<K> {
        GumpPath::new(self.iter().cloned())
    }
}

impl ToGumpPath<String> for &str {
    fn to_gump_path(self) -> GumpPath<String> {
        GumpPath::from_string(self)
    }
}

impl ToGumpPath<String> for String {
    fn to_gump_path(self) -> GumpPath<String> {
        GumpPath::from_string(&self)
    }
}

impl ToGumpPath<String> for &String {
    fn to_gump_path(self) -> GumpPath<String> {
        GumpPath::from_string(self)
    }
}

macro_rules! scalar_key_paths {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToGumpPath<$ty> for $ty {
                fn to_gump_path(self) -> GumpPath<$ty> {
                    GumpPath::single(self)
                }
            }
        )*
    };
}

scalar_key_paths!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize
);
