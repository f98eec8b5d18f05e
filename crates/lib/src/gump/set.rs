//! Observable leaf container bundling several values under one key.

use std::{
    cell::RefCell,
    collections::HashSet,
    fmt,
    rc::Rc,
};

use crate::{
    Element,
    events::{EventKind, EventManager, Observable},
};

/// Payload of a [`GumpSet`] event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetChange<V> {
    /// The single value that was added or deleted.
    Value(V),
    /// Every value removed by a clear.
    Values(Vec<V>),
}

impl<V> SetChange<V> {
    /// How many values this change touched.
    pub fn count(&self) -> usize {
        match self {
            SetChange::Value(_) => 1,
            SetChange::Values(values) => values.len(),
        }
    }

    /// The touched values as a vector.
    pub fn into_values(self) -> Vec<V> {
        match self {
            SetChange::Value(value) => vec![value],
            SetChange::Values(values) => values,
        }
    }
}

struct SetInner<V> {
    values: RefCell<HashSet<V>>,
    events: EventManager<SetChange<V>>,
}

/// An observable set of values.
///
/// `GumpSet` is a cheap-to-clone handle: clones share the same values and
/// listeners. Events are fired only for real changes:
///
/// - `Add` with [`SetChange::Value`] when the set grew
/// - `Delete` with [`SetChange::Value`] when a value was removed
/// - `Clear` with [`SetChange::Values`] when a non-empty set was emptied
///
/// ```
/// use gumpkit::gump::GumpSet;
///
/// let set = GumpSet::new();
/// assert!(set.add(1));
/// assert!(!set.add(1));
/// assert_eq!(set.len(), 1);
/// ```
pub struct GumpSet<V> {
    inner: Rc<SetInner<V>>,
}

impl<V: Element> GumpSet<V> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(SetInner {
                values: RefCell::new(HashSet::new()),
                events: EventManager::new(),
            }),
        }
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.inner.values.borrow().len()
    }

    /// Returns `true` if the set holds no value.
    pub fn is_empty(&self) -> bool {
        self.inner.values.borrow().is_empty()
    }

    /// Returns `true` if `value` is in the set.
    pub fn has(&self, value: &V) -> bool {
        self.inner.values.borrow().contains(value)
    }

    /// Snapshot of the contained values.
    pub fn values(&self) -> Vec<V> {
        self.inner.values.borrow().iter().cloned().collect()
    }

    /// Inserts `value`. Returns `false` if it was already present.
    pub fn add(&self, value: V) -> bool {
        let inserted = self.inner.values.borrow_mut().insert(value.clone());
        if inserted {
            self.inner.events.emit(EventKind::Add, SetChange::Value(value));
        }
        inserted
    }

    /// Removes `value`. Returns whether something was removed.
    pub fn delete(&self, value: &V) -> bool {
        let removed = self.inner.values.borrow_mut().take(value);
        match removed {
            Some(value) => {
                self.inner.events.emit(EventKind::Delete, SetChange::Value(value));
                true
            }
            None => false,
        }
    }

    /// Removes every value, returning them.
    pub fn clear(&self) -> Vec<V> {
        let removed: Vec<V> = self.inner.values.borrow_mut().drain().collect();
        if !removed.is_empty() {
            self.inner
                .events
                .emit(EventKind::Clear, SetChange::Values(removed.clone()));
        }
        removed
    }

    /// Replaces `old` by `new`.
    ///
    /// Nothing happens (and nothing fires) if `old` is absent.
    pub fn update_with_literal(&self, old: &V, new: V) -> bool {
        if !self.has(old) {
            return false;
        }
        self.delete(old);
        self.add(new);
        true
    }

    /// Replaces `value` by `f(value)`.
    ///
    /// Nothing happens (and nothing fires) if `value` is absent.
    pub fn update_with_function<F>(&self, value: &V, f: F) -> bool
    where
        F: FnOnce(&V) -> V,
    {
        if !self.has(value) {
            return false;
        }
        let replacement = f(value);
        self.delete(value);
        self.add(replacement);
        true
    }

    /// Returns `true` if both handles point to the same set.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<V: Element> Observable for GumpSet<V> {
    type Data = SetChange<V>;

    fn event_manager(&self) -> &EventManager<Self::Data> {
        &self.inner.events
    }
}

impl<V> Clone for GumpSet<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V: Element> Default for GumpSet<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Element> FromIterator<V> for GumpSet<V> {
    fn from_iter<T: IntoIterator<Item = V>>(iter: T) -> Self {
        let set = Self::new();
        for value in iter {
            set.add(value);
        }
        set
    }
}

impl<V: fmt::Debug> fmt::Debug for GumpSet<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.inner.values.borrow().iter()).finish()
    }
}
