//! One-to-one relation.

use std::collections::HashMap;

use super::{Cardinality, RelationEvent, RelationStorage, TolkienMap};
use crate::{
    Element, Result,
    events::{EventManager, Observable},
};

/// A relation where every x pairs with at most one y and every y with at
/// most one x.
///
/// Adding `(x, y)` silently evicts the previous partner of `x` and of `y`.
///
/// ```
/// use gumpkit::tolkien::{Tolkien1To1Map, TolkienMap};
///
/// let mut map = Tolkien1To1Map::from_pairs([("x", "y")]).unwrap();
/// map.set("x", "z").unwrap();
/// assert!(map.has_pair(&"x", &"z"));
/// assert!(!map.has_pair(&"x", &"y"));
/// assert_eq!(map.len(), 1);
/// ```
#[derive(Debug)]
pub struct Tolkien1To1Map<X, Y> {
    x_to_y: HashMap<X, Y>,
    y_to_x: HashMap<Y, X>,
    events: EventManager<RelationEvent<X, Y>>,
}

impl<X: Element, Y: Element> Tolkien1To1Map<X, Y> {
    pub fn new() -> Self {
        Self {
            x_to_y: HashMap::new(),
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

    /// The partner of `x`.
    pub fn get_y(&self, x: &X) -> Option<&Y> {
        self.x_to_y.get(x)
    }

    /// The partner of `y`.
    pub fn get_x(&self, y: &Y) -> Option<&X> {
        self.y_to_x.get(y)
    }
}

impl<X: Element, Y: Element> Default for Tolkien1To1Map<X, Y> {
    fn default() -> Self {
        Self::new()
    }
}

impl<X: Element, Y: Element> Observable for Tolkien1To1Map<X, Y> {
    type Data = RelationEvent<X, Y>;

    fn event_manager(&self) -> &EventManager<Self::Data> {
        &self.events
    }
}

impl<X: Element, Y: Element> TolkienMap<X, Y> for Tolkien1To1Map<X, Y> {
    fn cardinality(&self) -> Cardinality {
        Cardinality::OneToOne
    }

    fn len(&self) -> usize {
        self.x_to_y.len()
    }

    fn has_x(&self, x: &X) -> bool {
        self.x_to_y.contains_key(x)
    }

    fn has_y(&self, y: &Y) -> bool {
        self.y_to_x.contains_key(y)
    }

    fn has_pair(&self, x: &X, y: &Y) -> bool {
        self.x_to_y.get(x) == Some(y)
    }

    fn convert_x_to_y(&self, x: &X) -> Vec<Y> {
        self.x_to_y.get(x).cloned().into_iter().collect()
    }

    fn convert_y_to_x(&self, y: &Y) -> Vec<X> {
        self.y_to_x.get(y).cloned().into_iter().collect()
    }

    fn xs(&self) -> Vec<X> {
        self.x_to_y.keys().cloned().collect()
    }

    fn ys(&self) -> Vec<Y> {
        self.y_to_x.keys().cloned().collect()
    }

    fn entries(&self) -> Vec<(X, Y)> {
        self.x_to_y
            .iter()
            .map(|(x, y)| (x.clone(), y.clone()))
            .collect()
    }
}

impl<X: Element, Y: Element> RelationStorage<X, Y> for Tolkien1To1Map<X, Y> {
    fn add_imp(&mut self, x: X, y: Y) -> Result<()> {
        if let Some(old_y) = self.x_to_y.remove(&x) {
            self.y_to_x.remove(&old_y);
        }
        if let Some(old_x) = self.y_to_x.remove(&y) {
            self.x_to_y.remove(&old_x);
        }
        self.x_to_y.insert(x.clone(), y.clone());
        self.y_to_x.insert(y, x);
        Ok(())
    }

    fn delete_x(&mut self, x: &X) -> Result<Vec<(X, Y)>> {
        let Some(y) = self.x_to_y.remove(x) else {
            return Ok(Vec::new());
        };
        self.y_to_x.remove(&y);
        Ok(vec![(x.clone(), y)])
    }

    fn delete_y(&mut self, y: &Y) -> Result<Vec<(X, Y)>> {
        let Some(x) = self.y_to_x.remove(y) else {
            return Ok(Vec::new());
        };
        self.x_to_y.remove(&x);
        Ok(vec![(x, y.clone())])
    }

    fn delete_pair(&mut self, x: &X, y: &Y) -> Result<Vec<(X, Y)>> {
        if !self.has_pair(x, y) {
            return Ok(Vec::new());
        }
        self.delete_x(x)
    }

    fn clear_storage(&mut self) -> Vec<(X, Y)> {
        self.y_to_x.clear();
        self.x_to_y.drain().collect()
    }
}
