//! A relation of any cardinality, chosen at runtime.

use super::{
    Cardinality, RelationEvent, RelationStorage, Tolkien1ToNMap, Tolkien1To1Map, TolkienMToNMap,
    TolkienMap,
};
use crate::{
    Element, Result,
    events::{EventManager, Observable},
};

/// Closed set of the relation variants.
///
/// Used where the cardinality is only known at runtime, such as the result
/// of [`compose`](super::compose).
#[derive(Debug)]
pub enum TolkienRelation<X, Y> {
    OneToOne(Tolkien1To1Map<X, Y>),
    OneToMany(Tolkien1ToNMap<X, Y>),
    ManyToMany(TolkienMToNMap<X, Y>),
}

macro_rules! delegate {
    ($self:ident, $map:ident => $body:expr) => {
        match $self {
            TolkienRelation::OneToOne($map) => $body,
            TolkienRelation::OneToMany($map) => $body,
            TolkienRelation::ManyToMany($map) => $body,
        }
    };
}

impl<X: Element, Y: Element> TolkienRelation<X, Y> {
    /// An empty relation backed by the storage for `cardinality`.
    pub fn with_cardinality(cardinality: Cardinality) -> Self {
        match cardinality {
            Cardinality::OneToOne => TolkienRelation::OneToOne(Tolkien1To1Map::new()),
            Cardinality::OneToMany => TolkienRelation::OneToMany(Tolkien1ToNMap::new()),
            Cardinality::ManyToMany => TolkienRelation::ManyToMany(TolkienMToNMap::new()),
        }
    }

    /// A copy of `source` with the same cardinality and pairs.
    ///
    /// Listeners are not copied.
    pub fn copy_of<M: TolkienMap<X, Y>>(source: &M) -> Result<Self> {
        let mut copy = Self::with_cardinality(source.cardinality());
        for (x, y) in source.entries() {
            copy.add(x, y)?;
        }
        Ok(copy)
    }
}

impl<X: Element, Y: Element> Observable for TolkienRelation<X, Y> {
    type Data = RelationEvent<X, Y>;

    fn event_manager(&self) -> &EventManager<Self::Data> {
        delegate!(self, map => map.event_manager())
    }
}

impl<X: Element, Y: Element> TolkienMap<X, Y> for TolkienRelation<X, Y> {
    fn cardinality(&self) -> Cardinality {
        delegate!(self, map => map.cardinality())
    }

    fn len(&self) -> usize {
        delegate!(self, map => map.len())
    }

    fn has_x(&self, x: &X) -> bool {
        delegate!(self, map => map.has_x(x))
    }

    fn has_y(&self, y: &Y) -> bool {
        delegate!(self, map => map.has_y(y))
    }

    fn has_pair(&self, x: &X, y: &Y) -> bool {
        delegate!(self, map => map.has_pair(x, y))
    }

    fn convert_x_to_y(&self, x: &X) -> Vec<Y> {
        delegate!(self, map => map.convert_x_to_y(x))
    }

    fn convert_y_to_x(&self, y: &Y) -> Vec<X> {
        delegate!(self, map => map.convert_y_to_x(y))
    }

    fn xs(&self) -> Vec<X> {
        delegate!(self, map => map.xs())
    }

    fn ys(&self) -> Vec<Y> {
        delegate!(self, map => map.ys())
    }

    fn entries(&self) -> Vec<(X, Y)> {
        delegate!(self, map => map.entries())
    }
}

impl<X: Element, Y: Element> RelationStorage<X, Y> for TolkienRelation<X, Y> {
    fn add_imp(&mut self, x: X, y: Y) -> Result<()> {
        delegate!(self, map => map.add_imp(x, y))
    }

    fn delete_x(&mut self, x: &X) -> Result<Vec<(X, Y)>> {
        delegate!(self, map => map.delete_x(x))
    }

    fn delete_y(&mut self, y: &Y) -> Result<Vec<(X, Y)>> {
        delegate!(self, map => map.delete_y(y))
    }

    fn delete_pair(&mut self, x: &X, y: &Y) -> Result<Vec<(X, Y)>> {
        delegate!(self, map => map.delete_pair(x, y))
    }

    fn clear_storage(&mut self) -> Vec<(X, Y)> {
        delegate!(self, map => map.clear_storage())
    }
}

impl<X, Y> From<Tolkien1To1Map<X, Y>> for TolkienRelation<X, Y> {
    fn from(map: Tolkien1To1Map<X, Y>) -> Self {
        TolkienRelation::OneToOne(map)
    }
}

impl<X, Y> From<Tolkien1ToNMap<X, Y>> for TolkienRelation<X, Y> {
    fn from(map: Tolkien1ToNMap<X, Y>) -> Self {
        TolkienRelation::OneToMany(map)
    }
}

impl<X, Y> From<TolkienMToNMap<X, Y>> for TolkienRelation<X, Y> {
    fn from(map: TolkienMToNMap<X, Y>) -> Self {
        TolkienRelation::ManyToMany(map)
    }
}
