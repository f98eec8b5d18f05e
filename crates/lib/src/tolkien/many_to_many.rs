//! Many-to-many relation.

use super::{
    Cardinality, RelationEvent, RelationStorage, TolkienMap, first_keys, flat_entries, unlink,
    values_at,
};
use crate::{
    Element, Result,
    events::{EventManager, Observable},
    gump::{GumpMap, GumpPath},
};

/// A relation without cardinality limits. Both directions are multi-valued
/// and treated symmetrically.
#[derive(Debug)]
pub struct TolkienMToNMap<X, Y> {
    x_to_y: GumpMap<X, Y>,
    y_to_x: GumpMap<Y, X>,
    events: EventManager<RelationEvent<X, Y>>,
}

impl<X: Element, Y: Element> TolkienMToNMap<X, Y> {
    pub fn new() -> Self {
        Self {
            x_to_y: GumpMap::new(),
            y_to_x: GumpMap::new(),
            events: EventManager::new(),
        }
    }

    /// Builds a relation by adding every pair in order.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (X, Y)>) -> Result<Self> {
        let mut map = Self::new();
        for (x, y) in pairs {
            map.add(x, y)?;
        }
        Ok(map)
    }
}

impl<X: Element, Y: Element> Default for TolkienMToNMap<X, Y> {
    fn default() -> Self {
        Self::new()
    }
}

impl<X: Element, Y: Element> Observable for TolkienMToNMap<X, Y> {
    type Data = RelationEvent<X, Y>;

    fn event_manager(&self) -> &EventManager<Self::Data> {
        &self.events
    }
}

impl<X: Element, Y: Element> TolkienMap<X, Y> for TolkienMToNMap<X, Y> {
    fn cardinality(&self) -> Cardinality {
        Cardinality::ManyToMany
    }

    fn len(&self) -> usize {
        self.x_to_y.len()
    }

    fn has_x(&self, x: &X) -> bool {
        self.x_to_y.has(GumpPath::single(x.clone()))
    }

    fn has_y(&self, y: &Y) -> bool {
        self.y_to_x.has(GumpPath::single(y.clone()))
    }

    fn has_pair(&self, x: &X, y: &Y) -> bool {
        self.x_to_y.has_value(GumpPath::single(x.clone()), y)
    }

    fn convert_x_to_y(&self, x: &X) -> Vec<Y> {
        values_at(&self.x_to_y, x)
    }

    fn convert_y_to_x(&self, y: &Y) -> Vec<X> {
        values_at(&self.y_to_x, y)
    }

    fn xs(&self) -> Vec<X> {
        first_keys(&self.x_to_y)
    }

    fn ys(&self) -> Vec<Y> {
        first_keys(&self.y_to_x)
    }

    fn entries(&self) -> Vec<(X, Y)> {
        flat_entries(&self.x_to_y)
    }
}

impl<X: Element, Y: Element> RelationStorage<X, Y> for TolkienMToNMap<X, Y> {
    fn add_imp(&mut self, x: X, y: Y) -> Result<()> {
        self.x_to_y.add(GumpPath::single(x.clone()), y.clone())?;
        self.y_to_x.add(GumpPath::single(y), x)?;
        Ok(())
    }

    fn delete_x(&mut self, x: &X) -> Result<Vec<(X, Y)>> {
        let ys = self.convert_x_to_y(x);
        self.x_to_y.delete(GumpPath::single(x.clone()))?;
        for y in &ys {
            unlink(&self.y_to_x, y, x)?;
        }
        Ok(ys.into_iter().map(|y| (x.clone(), y)).collect())
    }

    fn delete_y(&mut self, y: &Y) -> Result<Vec<(X, Y)>> {
        let xs = self.convert_y_to_x(y);
        self.y_to_x.delete(GumpPath::single(y.clone()))?;
        for x in &xs {
            unlink(&self.x_to_y, x, y)?;
        }
        Ok(xs.into_iter().map(|x| (x, y.clone())).collect())
    }

    fn delete_pair(&mut self, x: &X, y: &Y) -> Result<Vec<(X, Y)>> {
        if !self.has_pair(x, y) {
            return Ok(Vec::new());
        }
        unlink(&self.x_to_y, x, y)?;
        unlink(&self.y_to_x, y, x)?;
        Ok(vec![(x.clone(), y.clone())])
    }

    fn clear_storage(&mut self) -> Vec<(X, Y)> {
        let removed = self.entries();
        self.x_to_y.clear();
        self.y_to_x.clear();
        removed
    }
}
