//! Transitive composition of relations.

use tracing::trace;

use super::{TolkienMap, TolkienRelation};
use crate::{Element, Result};

/// Composes `A <-> B` with `B <-> C` into `A <-> C`.
///
/// The result holds `(a, c)` for every `b` linking them and uses the wider
/// of the two input cardinalities.
pub fn compose_pair<A, B, C, L, R>(left: &L, right: &R) -> Result<TolkienRelation<A, C>>
where
    A: Element,
    B: Element,
    C: Element,
    L: TolkienMap<A, B>,
    R: TolkienMap<B, C>,
{
    let cardinality = left.cardinality().max(right.cardinality());
    let mut composed = TolkienRelation::with_cardinality(cardinality);

    for a in left.xs() {
        for b in left.convert_x_to_y(&a) {
            for c in right.convert_x_to_y(&b) {
                composed.add(a.clone(), c)?;
            }
        }
    }

    trace!(
        left = %left.cardinality(),
        right = %right.cardinality(),
        pairs = composed.len(),
        "composed relations"
    );
    Ok(composed)
}

/// Left-folds [`compose_pair`] over a sequence of relations over one type.
///
/// A single relation is copied unchanged. Returns `None` for an empty
/// sequence.
///
/// Every relation must map `T` to `T` and be of one Rust type; wrap mixed
/// variants in [`TolkienRelation`]. Chains whose key types change along the
/// way are built by nesting [`compose_pair`]:
///
/// ```
/// use gumpkit::tolkien::{Tolkien1ToNMap, TolkienMToNMap, TolkienMap, compose_pair};
///
/// let ids = Tolkien1ToNMap::from_pairs([(1, "one".to_string())]).unwrap();
/// let tags = TolkienMToNMap::from_pairs([("one".to_string(), 'a')]).unwrap();
/// let back = TolkienMToNMap::from_pairs([('a', 10)]).unwrap();
///
/// let chained = compose_pair(&compose_pair(&ids, &tags).unwrap(), &back).unwrap();
/// assert!(chained.has_pair(&1, &10));
/// ```
///
/// ```
/// use gumpkit::tolkien::{Cardinality, Tolkien1To1Map, TolkienMap, compose};
///
/// let first = Tolkien1To1Map::from_pairs([(1, 2)]).unwrap();
/// let second = Tolkien1To1Map::from_pairs([(2, 3)]).unwrap();
///
/// let chained = compose([&first, &second]).unwrap().unwrap();
/// assert!(chained.has_pair(&1, &3));
/// assert_eq!(chained.cardinality(), Cardinality::OneToOne);
/// ```
pub fn compose<'a, T, M, I>(maps: I) -> Result<Option<TolkienRelation<T, T>>>
where
    T: Element,
    M: TolkienMap<T, T> + 'a,
    I: IntoIterator<Item = &'a M>,
{
    let mut maps = maps.into_iter();
    let Some(first) = maps.next() else {
        return Ok(None);
    };

    let mut composed = TolkienRelation::copy_of(first)?;
    for next in maps {
        composed = compose_pair(&composed, next)?;
    }
    Ok(Some(composed))
}
