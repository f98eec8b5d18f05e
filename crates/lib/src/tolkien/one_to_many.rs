//! One-to-many relation.

use std::collections::HashMap;

use super::{
    Cardinality, RelationEvent, RelationStorage, TolkienMap, first_keys, flat_entries, unlink,
    values_at,
};
use crate::{
    Element, Result,
    events::{EventManager, Observable},
    gump::{GumpMap, GumpPath},
};

/// A relation where one x may pair with many ys but every y has a single
/// owner x.
///
/// Adding `(x, y)` moves `y` away from its previous owner.
#[derive(Debug)]
pub struct Tolkien1ToNMap<X, Y> {
    x_to_y: GumpMap<X, Y>,
    y_to_x: HashMap<Y, X>,
    events: EventManager<RelationEvent<X, Y>>,
}

impl<X: Element, Y: Element> Tolkien1ToNMap<X, Y> {
    pub fn new() -> Self {
        Self {
            x_to_y: GumpMap::new(),
            y_to_x: HashMap::new(),
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

    /// The owner of `y`.
    pub fn get_x(&self, y: &Y) -> Option<&X> {
        self.y_to_x.get(y)
    }
}

impl<X: Element, Y: Element> Default for Tolkien1ToNMap<X, Y> {
    fn default() -> Self {
        Self::new()
    }
}

impl<X: Element, Y: Element> Observable for Tolkien1ToNMap<X, Y> {
    type Data = RelationEvent<X, Y>;

    fn event_manager(&self) -> &EventManager<Self::Data> {
        &self.events
    }
}

impl<X: Element, Y: Element> TolkienMap<X, Y> for Tolkien1ToNMap<X, Y> {
    fn cardinality(&self) -> Cardinality {
        Cardinality::OneToMany
    }

    fn len(&self) -> usize {
        self.y_to_x.len()
    }

    fn has_x(&self, x: &X) -> bool {
        self.x_to_y.has(GumpPath::single(x.clone()))
    }

    fn has_y(&self, y: &Y) -> bool {
        self.y_to_x.contains_key(y)
    }

    fn has_pair(&self, x: &X, y: &Y) -> bool {
        self.y_to_x.get(y) == Some(x)
    }

    fn convert_x_to_y(&self, x: &X) -> Vec<Y> {
        values_at(&self.x_to_y, x)
    }

    fn convert_y_to_x(&self, y: &Y) -> Vec<X> {
        self.y_to_x.get(y).cloned().into_iter().collect()
    }

    fn xs(&self) -> Vec<X> {
        first_keys(&self.x_to_y)
    }

    fn ys(&self) -> Vec<Y> {
        self.y_to_x.keys().cloned().collect()
    }

    fn entries(&self) -> Vec<(X, Y)> {
        flat_entries(&self.x_to_y)
    }
}

impl<X: Element, Y: Element> RelationStorage<X, Y> for Tolkien1ToNMap<X, Y> {
    fn add_imp(&mut self, x: X, y: Y) -> Result<()> {
        if let Some(owner) = self.y_to_x.get(&y).cloned() {
            unlink(&self.x_to_y, &owner, &y)?;
        }
        self.x_to_y.add(GumpPath::single(x.clone()), y.clone())?;
        self.y_to_x.insert(y, x);
        Ok(())
    }

    fn delete_x(&mut self, x: &X) -> Result<Vec<(X, Y)>> {
        let ys = self.convert_x_to_y(x);
        self.x_to_y.delete(GumpPath::single(x.clone()))?;
        for y in &ys {
            self.y_to_x.remove(y);
        }
        Ok(ys.into_iter().map(|y| (x.clone(), y)).collect())
    }

    fn delete_y(&mut self, y: &Y) -> Result<Vec<(X, Y)>> {
        let Some(owner) = self.y_to_x.get(y).cloned() else {
            return Ok(Vec::new());
        };
        self.delete_pair(&owner, y)
    }

    fn delete_pair(&mut self, x: &X, y: &Y) -> Result<Vec<(X, Y)>> {
        if !self.has_pair(x, y) {
            return Ok(Vec::new());
        }
        unlink(&self.x_to_y, x, y)?;
        self.y_to_x.remove(y);
        Ok(vec![(x.clone(), y.clone())])
    }

    fn clear_storage(&mut self) -> Vec<(X, Y)> {
        let removed = self.entries();
        self.x_to_y.clear();
        self.y_to_x.clear();
        removed
    }
}
