//! Bidirectional relation maps.
//!
//! A Tolkien map ("there and back again") stores pairs `(x, y)` and keeps two
//! synchronized directions, `x -> y` and `y -> x`, so both sides can be
//! queried in constant time. Three cardinalities are provided:
//!
//! | Variant | `x -> y` | `y -> x` | Invariant |
//! |---|---|---|---|
//! | [`Tolkien1To1Map`] | `HashMap` | `HashMap` | every x pairs with at most one y and vice versa |
//! | [`Tolkien1ToNMap`] | [`GumpMap`] | `HashMap` | every y pairs with at most one x |
//! | [`TolkienMToNMap`] | [`GumpMap`] | [`GumpMap`] | none |
//!
//! The [`TolkienMap`] trait holds the shared operations. Variants implement
//! crate-private storage primitives; `add`, `delete`, `set` and `clear` are
//! provided on top of them and fire the relation's events.
//!
//! Relations compose: [`compose_pair`] chains `A <-> B` with `B <-> C` into
//! `A <-> C` using the wider of the two cardinalities.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    Element, Result,
    events::{EventKind, Observable},
    gump::{GumpMap, GumpPath},
};

pub mod compose;
pub mod many_to_many;
pub mod one_to_many;
pub mod one_to_one;
pub mod relation;

pub use compose::{compose, compose_pair};
pub use many_to_many::TolkienMToNMap;
pub use one_to_many::Tolkien1ToNMap;
pub use one_to_one::Tolkien1To1Map;
pub use relation::TolkienRelation;

/// How many partners each side of a relation may have.
///
/// Ordered from narrowest to widest, so `max` picks the storage able to hold
/// both inputs of a composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToMany,
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::OneToOne => f.write_str("1:1"),
            Cardinality::OneToMany => f.write_str("1:N"),
            Cardinality::ManyToMany => f.write_str("M:N"),
        }
    }
}

/// Which pairs a delete or existence query targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairSelector<X, Y> {
    /// Every pair with this x.
    X(X),
    /// Every pair with this y.
    Y(Y),
    /// Exactly this pair.
    Pair(X, Y),
}

/// Payload of relation events.
///
/// `Add` carries the added pair, `Delete` the selector fields that were given
/// plus every removed pair, and `Clear` only the removed pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationEvent<X, Y> {
    pub x: Option<X>,
    pub y: Option<Y>,
    pub pairs: Vec<(X, Y)>,
}

mod storage {
    use crate::{Element, Result};

    /// Mutating primitives behind [`TolkienMap`](super::TolkienMap).
    ///
    /// They keep both directions in step but fire nothing, so the trait is
    /// only reachable inside this crate. Callers outside go through the
    /// provided `add`, `delete`, `set` and `clear`.
    pub trait RelationStorage<X: Element, Y: Element> {
        /// Stores a pair known to be absent, evicting whatever the
        /// cardinality forbids.
        fn add_imp(&mut self, x: X, y: Y) -> Result<()>;

        /// Removes every pair with `x`.
        fn delete_x(&mut self, x: &X) -> Result<Vec<(X, Y)>>;

        /// Removes every pair with `y`.
        fn delete_y(&mut self, y: &Y) -> Result<Vec<(X, Y)>>;

        /// Removes exactly one pair if present.
        fn delete_pair(&mut self, x: &X, y: &Y) -> Result<Vec<(X, Y)>>;

        /// Empties both directions, returning the removed pairs.
        fn clear_storage(&mut self) -> Vec<(X, Y)>;
    }
}

use storage::RelationStorage;

/// Shared interface of the bidirectional relation maps.
///
/// The trait is sealed: its storage primitives are crate-private, so every
/// mutation made through it fires the relation's events.
///
/// ```compile_fail
/// use gumpkit::tolkien::{Tolkien1To1Map, TolkienMap};
///
/// let mut relation = Tolkien1To1Map::<i32, i32>::new();
/// relation.add(1, 2).unwrap();
/// // storage primitives bypass the events and are not callable here
/// relation.delete_x(&1).unwrap();
/// ```
pub trait TolkienMap<X: Element, Y: Element>:
    Observable<Data = RelationEvent<X, Y>> + RelationStorage<X, Y>
{
    /// Cardinality of this variant.
    fn cardinality(&self) -> Cardinality;

    /// Number of stored pairs.
    fn len(&self) -> usize;

    fn has_x(&self, x: &X) -> bool;

    fn has_y(&self, y: &Y) -> bool;

    fn has_pair(&self, x: &X, y: &Y) -> bool;

    /// Every y paired with `x`.
    fn convert_x_to_y(&self, x: &X) -> Vec<Y>;

    /// Every x paired with `y`.
    fn convert_y_to_x(&self, y: &Y) -> Vec<X>;

    /// Every distinct x.
    fn xs(&self) -> Vec<X>;

    /// Every distinct y.
    fn ys(&self) -> Vec<Y>;

    /// Every stored pair.
    fn entries(&self) -> Vec<(X, Y)>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds the pair `(x, y)` and fires `Add`.
    ///
    /// Returns `Ok(false)` without firing if the pair already exists. Pairs
    /// evicted to preserve the cardinality are removed silently; use
    /// [`TolkienMap::set`] to have them reported.
    fn add(&mut self, x: X, y: Y) -> Result<bool> {
        if self.has_pair(&x, &y) {
            return Ok(false);
        }
        self.add_imp(x.clone(), y.clone())?;

        trace!(x = ?x, y = ?y, cardinality = %self.cardinality(), "added pair");
        self.event_manager().emit(
            EventKind::Add,
            RelationEvent {
                x: Some(x.clone()),
                y: Some(y.clone()),
                pairs: vec![(x, y)],
            },
        );
        Ok(true)
    }

    /// Removes the selected pairs, firing `Delete` if anything was removed.
    fn delete(&mut self, selector: PairSelector<X, Y>) -> Result<Vec<(X, Y)>> {
        let (x, y, removed) = match selector {
            PairSelector::X(x) => {
                let removed = self.delete_x(&x)?;
                (Some(x), None, removed)
            }
            PairSelector::Y(y) => {
                let removed = self.delete_y(&y)?;
                (None, Some(y), removed)
            }
            PairSelector::Pair(x, y) => {
                let removed = self.delete_pair(&x, &y)?;
                (Some(x), Some(y), removed)
            }
        };

        if !removed.is_empty() {
            trace!(x = ?x, y = ?y, count = removed.len(), "deleted pairs");
            self.event_manager().emit(
                EventKind::Delete,
                RelationEvent {
                    x,
                    y,
                    pairs: removed.clone(),
                },
            );
        }
        Ok(removed)
    }

    /// Replaces every pairing of `x` and of `y` by the single pair `(x, y)`.
    fn set(&mut self, x: X, y: Y) -> Result<bool> {
        self.delete(PairSelector::X(x.clone()))?;
        self.delete(PairSelector::Y(y.clone()))?;
        self.add(x, y)
    }

    /// Returns `true` if any pair matches `selector`.
    fn has(&self, selector: &PairSelector<X, Y>) -> bool {
        match selector {
            PairSelector::X(x) => self.has_x(x),
            PairSelector::Y(y) => self.has_y(y),
            PairSelector::Pair(x, y) => self.has_pair(x, y),
        }
    }

    /// Returns `true` if `x` or `y` takes part in any pair.
    fn has_either(&self, x: &X, y: &Y) -> bool {
        self.has_x(x) || self.has_y(y)
    }

    /// Removes every pair, firing `Clear` if the relation was non-empty.
    fn clear(&mut self) -> Vec<(X, Y)> {
        let removed = self.clear_storage();
        if !removed.is_empty() {
            trace!(count = removed.len(), "cleared relation");
            self.event_manager().emit(
                EventKind::Clear,
                RelationEvent {
                    x: None,
                    y: None,
                    pairs: removed.clone(),
                },
            );
        }
        removed
    }
}

/// Values stored under the single-key path `key`.
pub(crate) fn values_at<K: Element, V: Element>(map: &GumpMap<K, V>, key: &K) -> Vec<V> {
    map.get_set(GumpPath::single(key.clone()))
        .map(|set| set.values())
        .unwrap_or_default()
}

/// Distinct first-level keys of a relation side.
pub(crate) fn first_keys<K: Element, V: Element>(map: &GumpMap<K, V>) -> Vec<K> {
    map.keys_with(false)
        .filter_map(|path| path.head().cloned())
        .collect()
}

/// Every `(key, value)` stored one level deep.
pub(crate) fn flat_entries<K: Element, V: Element>(map: &GumpMap<K, V>) -> Vec<(K, V)> {
    map.entries()
        .filter_map(|(path, value)| path.head().cloned().map(|key| (key, value)))
        .collect()
}

/// Removes `value` from the set at `key`, dropping the key once its set is
/// empty so membership queries stay exact.
pub(crate) fn unlink<K: Element, V: Element>(
    map: &GumpMap<K, V>,
    key: &K,
    value: &V,
) -> Result<bool> {
    let path = GumpPath::single(key.clone());
    let removed = map.delete_value(&path, value)?;
    if map.get_set(&path).is_some_and(|set| set.is_empty()) {
        map.delete(&path)?;
    }
    Ok(removed)
}
