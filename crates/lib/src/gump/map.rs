//! Observable, arbitrarily deep, path-addressable multi-map.
//!
//! A [`GumpMap`] is a tree whose interior nodes are `GumpMap`s and whose
//! leaves are [`GumpSet`]s. Scalars are never stored bare: adding a value
//! under a key wraps it into the set living at that key.
//!
//! # Event bubbling
//!
//! A parent subscribes to every child it wires in, once per key. When a child
//! fires, each subscription checks that its key still holds the child (by
//! [`SourceId`]), prepends that key to the event path, adjusts the parent's
//! running size by the event's `count`, and re-fires the event with the same
//! kind. A container wired under two keys is therefore counted and reported
//! under both. The root therefore sees every
//! mutation anywhere in the tree with the full path.
//!
//! Detaching a child (`delete`, `clear`, `purge_empty_containers`) removes the
//! parent's listener first, so a detached subtree never drives the size or
//! the events of a map it no longer belongs to.
//!
//! ```
//! use gumpkit::gump::GumpMap;
//!
//! let map = GumpMap::from_entries([("a.b", 1), ("a.b", 2), ("a.c", 3)]).unwrap();
//! assert_eq!(map.len(), 3);
//! assert!(map.has_value("a.b", &2));
//!
//! // "a" holds a map, so it cannot take a scalar
//! assert!(map.add("a", 4).is_err());
//! ```

use std::{
    cell::RefCell,
    collections::HashMap,
    fmt,
    rc::Rc,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::{
    errors::GumpError,
    path::{GumpPath, ToGumpPath},
    set::{GumpSet, SetChange},
};
use crate::{
    Element, Result,
    events::{Event, EventFilter, EventKind, EventManager, ListenerId, Observable, SourceId},
};

/// The two container kinds a key can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    /// A nested [`GumpMap`].
    Map,
    /// A leaf [`GumpSet`].
    Set,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Map => f.write_str("GumpMap"),
            NodeKind::Set => f.write_str("GumpSet"),
        }
    }
}

/// A child stored under a key of a [`GumpMap`].
pub enum GumpNode<K, V> {
    /// A nested map.
    Map(GumpMap<K, V>),
    /// A leaf set.
    Set(GumpSet<V>),
}

impl<K: Element, V: Element> GumpNode<K, V> {
    /// Which kind of container this is.
    pub fn kind(&self) -> NodeKind {
        match self {
            GumpNode::Map(_) => NodeKind::Map,
            GumpNode::Set(_) => NodeKind::Set,
        }
    }

    /// Number of leaf values beneath this node.
    pub fn len(&self) -> usize {
        match self {
            GumpNode::Map(map) => map.len(),
            GumpNode::Set(set) => set.len(),
        }
    }

    /// Returns `true` if no leaf value is reachable from this node.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The nested map, if this is one.
    pub fn as_map(&self) -> Option<&GumpMap<K, V>> {
        match self {
            GumpNode::Map(map) => Some(map),
            GumpNode::Set(_) => None,
        }
    }

    /// The leaf set, if this is one.
    pub fn as_set(&self) -> Option<&GumpSet<V>> {
        match self {
            GumpNode::Set(set) => Some(set),
            GumpNode::Map(_) => None,
        }
    }

    /// Every leaf value beneath this node.
    pub fn leaf_values(&self) -> Vec<V> {
        match self {
            GumpNode::Map(map) => map.values().collect(),
            GumpNode::Set(set) => set.values(),
        }
    }

    /// Returns `true` if both nodes are the same container.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (GumpNode::Map(a), GumpNode::Map(b)) => a.ptr_eq(b),
            (GumpNode::Set(a), GumpNode::Set(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    fn source_id(&self) -> SourceId {
        match self {
            GumpNode::Map(map) => map.source_id(),
            GumpNode::Set(set) => set.source_id(),
        }
    }

    fn unsubscribe(&self, id: ListenerId) {
        match self {
            GumpNode::Map(map) => map.remove_listener(id),
            GumpNode::Set(set) => set.remove_listener(id),
        };
    }
}

impl<K, V> Clone for GumpNode<K, V> {
    fn clone(&self) -> Self {
        match self {
            GumpNode::Map(map) => GumpNode::Map(map.clone()),
            GumpNode::Set(set) => GumpNode::Set(set.clone()),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for GumpNode<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GumpNode::Map(map) => fmt::Debug::fmt(map, f),
            GumpNode::Set(set) => fmt::Debug::fmt(set, f),
        }
    }
}

impl<K, V> From<GumpMap<K, V>> for GumpNode<K, V> {
    fn from(map: GumpMap<K, V>) -> Self {
        GumpNode::Map(map)
    }
}

impl<K, V> From<GumpSet<V>> for GumpNode<K, V> {
    fn from(set: GumpSet<V>) -> Self {
        GumpNode::Set(set)
    }
}

/// What a [`MapEvent`] added or removed.
#[derive(Debug, Clone)]
pub enum Change<K, V> {
    /// One leaf value.
    Value(V),
    /// Several leaf values, e.g. everything removed by a clear.
    Values(Vec<V>),
    /// A whole container wired in or detached.
    Node(GumpNode<K, V>),
}

impl<K, V> From<SetChange<V>> for Change<K, V> {
    fn from(change: SetChange<V>) -> Self {
        match change {
            SetChange::Value(value) => Change::Value(value),
            SetChange::Values(values) => Change::Values(values),
        }
    }
}

/// Payload of a [`GumpMap`] event.
#[derive(Debug, Clone)]
pub struct MapEvent<K, V> {
    /// Where the change happened, relative to the map firing the event.
    ///
    /// Empty when the map itself was cleared.
    pub path: GumpPath<K>,
    /// The value(s) or container involved.
    pub change: Change<K, V>,
    /// Number of leaf values added or removed.
    pub count: usize,
}

/// An item produced by iteration with [`ResolveOptions`].
#[derive(Debug, Clone)]
pub enum Resolved<K, V> {
    /// A leaf value.
    Value(V),
    /// A container at which descent stopped.
    Node(GumpNode<K, V>),
}

impl<K, V> Resolved<K, V> {
    /// The leaf value, if descent reached one.
    pub fn into_value(self) -> Option<V> {
        match self {
            Resolved::Value(value) => Some(value),
            Resolved::Node(_) => None,
        }
    }
}

/// Controls how deep iteration descends.
///
/// With `resolve_maps = false` nested maps are yielded as containers instead
/// of being descended into; `resolve_sets = false` does the same for sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveOptions {
    pub resolve_maps: bool,
    pub resolve_sets: bool,
}

impl ResolveOptions {
    /// Fully resolved iteration: one item per stored value.
    pub fn new() -> Self {
        Self {
            resolve_maps: true,
            resolve_sets: true,
        }
    }

    /// Stops at the direct children of the map.
    pub fn unresolved() -> Self {
        Self {
            resolve_maps: false,
            resolve_sets: false,
        }
    }

    /// Sets whether nested maps are descended into.
    pub fn with_resolve_maps(mut self, resolve_maps: bool) -> Self {
        self.resolve_maps = resolve_maps;
        self
    }

    /// Sets whether leaf sets are expanded into their values.
    pub fn with_resolve_sets(mut self, resolve_sets: bool) -> Self {
        self.resolve_sets = resolve_sets;
        self
    }
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self::new()
    }
}

struct ChildSlot<K, V> {
    node: GumpNode<K, V>,
    listener: ListenerId,
}

struct MapState<K, V> {
    /// Leaf values reachable beneath this map, maintained from child events
    size: usize,
    children: HashMap<K, ChildSlot<K, V>>,
    /// Reverse lookup from a wired child to every key it is stored under
    child_to_key: HashMap<SourceId, Vec<K>>,
}

impl<K, V> MapState<K, V> {
    fn apply(&mut self, kind: EventKind, count: usize) {
        match kind {
            EventKind::Add => self.size += count,
            EventKind::Delete | EventKind::Clear => match self.size.checked_sub(count) {
                Some(size) => self.size = size,
                None => {
                    warn!(
                        size = self.size,
                        count, "size accounting underflow, clamping to zero"
                    );
                    self.size = 0;
                }
            },
        }
    }
}

struct MapInner<K, V> {
    state: RefCell<MapState<K, V>>,
    events: EventManager<MapEvent<K, V>>,
}

enum Insert<K, V> {
    Value(V),
    Node(GumpNode<K, V>),
}

/// An observable, path-addressable multi-map.
///
/// `GumpMap` is a cheap-to-clone handle; clones share the same tree. Every
/// mutating method takes `&self`.
pub struct GumpMap<K, V> {
    inner: Rc<MapInner<K, V>>,
}

impl<K: Element, V: Element> GumpMap<K, V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(MapInner {
                state: RefCell::new(MapState {
                    size: 0,
                    children: HashMap::new(),
                    child_to_key: HashMap::new(),
                }),
                events: EventManager::new(),
            }),
        }
    }

    /// Creates a map by adding every `(path, value)` pair in order.
    pub fn from_entries<P, I>(entries: I) -> Result<Self>
    where
        P: ToGumpPath<K>,
        I: IntoIterator<Item = (P, V)>,
    {
        let map = Self::new();
        for (path, value) in entries {
            map.add(path, value)?;
        }
        Ok(map)
    }

    /// Total number of leaf values beneath this map.
    pub fn len(&self) -> usize {
        self.inner.state.borrow().size
    }

    /// Returns `true` if no leaf value is stored.
    ///
    /// A map holding only empty containers is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds `value` to the set at `path`, creating maps and the set as needed.
    ///
    /// The empty path is a no-op.
    ///
    /// # Errors
    ///
    /// [`GumpError::TypeMismatch`] if the path runs through a set or ends at
    /// a map.
    pub fn add(&self, path: impl ToGumpPath<K>, value: V) -> Result<()> {
        let path = path.to_gump_path();
        self.add_at(&path, 0, Insert::Value(value))
    }

    /// Wires an existing container in at `path`.
    ///
    /// Its current size is folded into this map and its future events bubble.
    ///
    /// # Errors
    ///
    /// [`GumpError::Occupied`] if the key is already taken,
    /// [`GumpError::TypeMismatch`] if the path runs through a set,
    /// [`GumpError::Cycle`] if the node is a map that already contains the
    /// map it would be wired into.
    pub fn add_node(&self, path: impl ToGumpPath<K>, node: impl Into<GumpNode<K, V>>) -> Result<()> {
        let path = path.to_gump_path();
        let node = node.into();
        if let (GumpNode::Map(map), false) = (&node, path.is_empty()) {
            let (parent, depth) = self.deepest_map_on(&path);
            if map.contains_map(&parent) {
                let path = describe(&path, depth);
                debug!(%path, "rejecting container that would contain itself");
                return Err(GumpError::Cycle { path }.into());
            }
        }
        self.add_at(&path, 0, Insert::Node(node))
    }

    /// The deepest existing map on the way to the last key of `path`, with
    /// its depth.
    fn deepest_map_on(&self, path: &GumpPath<K>) -> (GumpMap<K, V>, usize) {
        let mut current = self.clone();
        let mut depth = 0;
        while depth + 1 < path.len() {
            let next = path.key_at(depth).and_then(|key| current.child(key));
            match next {
                Some(GumpNode::Map(map)) => {
                    current = map;
                    depth += 1;
                }
                _ => break,
            }
        }
        (current, depth)
    }

    /// Returns `true` if `target` is this map or lies anywhere beneath it.
    fn contains_map(&self, target: &GumpMap<K, V>) -> bool {
        self.ptr_eq(target)
            || self.children_snapshot().into_iter().any(|(_, node)| match node {
                GumpNode::Map(map) => map.contains_map(target),
                GumpNode::Set(_) => false,
            })
    }

    fn add_at(&self, path: &GumpPath<K>, depth: usize, item: Insert<K, V>) -> Result<()> {
        let Some(key) = path.key_at(depth) else {
            return Ok(());
        };
        let existing = self.child(key);

        if depth + 1 < path.len() {
            return match existing {
                Some(GumpNode::Map(map)) => map.add_at(path, depth + 1, item),
                Some(found) => Err(mismatch(path, depth, NodeKind::Map, found.kind())),
                None => {
                    let map = GumpMap::new();
                    self.set_next_level(key.clone(), GumpNode::Map(map.clone()));
                    map.add_at(path, depth + 1, item)
                }
            };
        }

        match (existing, item) {
            (Some(GumpNode::Set(set)), Insert::Value(value)) => {
                set.add(value);
                Ok(())
            }
            (Some(found), Insert::Value(_)) => {
                Err(mismatch(path, depth, NodeKind::Set, found.kind()))
            }
            (Some(found), Insert::Node(_)) => Err(GumpError::Occupied {
                path: describe(path, depth),
                found: found.kind(),
            }
            .into()),
            (None, Insert::Value(value)) => {
                let set = GumpSet::new();
                self.set_next_level(key.clone(), GumpNode::Set(set.clone()));
                set.add(value);
                Ok(())
            }
            (None, Insert::Node(node)) => {
                let count = node.len();
                self.set_next_level(key.clone(), node.clone());
                self.inner.state.borrow_mut().apply(EventKind::Add, count);
                debug!(key = ?key, kind = %node.kind(), count, "wired in container");
                self.inner.events.emit(
                    EventKind::Add,
                    MapEvent {
                        path: GumpPath::single(key.clone()),
                        change: Change::Node(node),
                        count,
                    },
                );
                Ok(())
            }
        }
    }

    /// Stores `node` under `key` and subscribes to its events.
    fn set_next_level(&self, key: K, node: GumpNode<K, V>) {
        let listener = self.subscribe(&key, &node);
        let mut state = self.inner.state.borrow_mut();
        state
            .child_to_key
            .entry(node.source_id())
            .or_default()
            .push(key.clone());
        state.children.insert(key, ChildSlot { node, listener });
    }

    fn subscribe(&self, key: &K, node: &GumpNode<K, V>) -> ListenerId {
        let parent = Rc::downgrade(&self.inner);
        let key = key.clone();
        match node {
            GumpNode::Set(set) => {
                set.add_listener(EventFilter::Any, move |event: &Event<SetChange<V>>| {
                    if let Some(inner) = parent.upgrade() {
                        GumpMap { inner }.bubble(
                            &key,
                            event.source,
                            event.kind,
                            GumpPath::empty(),
                            event.data.clone().into(),
                            event.data.count(),
                        );
                    }
                })
            }
            GumpNode::Map(map) => {
                map.add_listener(EventFilter::Any, move |event: &Event<MapEvent<K, V>>| {
                    if let Some(inner) = parent.upgrade() {
                        GumpMap { inner }.bubble(
                            &key,
                            event.source,
                            event.kind,
                            event.data.path.clone(),
                            event.data.change.clone(),
                            event.data.count,
                        );
                    }
                })
            }
        }
    }

    /// Re-fires a child event from this map with `key` prepended.
    fn bubble(
        &self,
        key: &K,
        source: SourceId,
        kind: EventKind,
        path: GumpPath<K>,
        change: Change<K, V>,
        count: usize,
    ) {
        {
            let mut state = self.inner.state.borrow_mut();
            let wired = state
                .child_to_key
                .get(&source)
                .is_some_and(|keys| keys.contains(key));
            if !wired {
                trace!(%source, %kind, key = ?key, "ignoring event from an unknown child");
                return;
            }
            state.apply(kind, count);
        }

        let path = path.prepend(key.clone());
        trace!(path = ?path, %kind, count, "bubbling child event");
        self.inner
            .events
            .emit(kind, MapEvent { path, change, count });
    }

    /// Removes the container at `path`.
    ///
    /// Returns `Ok(false)` if nothing was stored there.
    ///
    /// # Errors
    ///
    /// [`GumpError::TypeMismatch`] if the path runs through a set.
    pub fn delete(&self, path: impl ToGumpPath<K>) -> Result<bool> {
        let path = path.to_gump_path();
        self.delete_at(&path, 0, None)
    }

    /// Removes `value` from the set at `path`.
    ///
    /// # Errors
    ///
    /// [`GumpError::TypeMismatch`] if the path runs through a set or ends at
    /// a map.
    pub fn delete_value(&self, path: impl ToGumpPath<K>, value: &V) -> Result<bool> {
        let path = path.to_gump_path();
        self.delete_at(&path, 0, Some(value))
    }

    fn delete_at(&self, path: &GumpPath<K>, depth: usize, value: Option<&V>) -> Result<bool> {
        let Some(key) = path.key_at(depth) else {
            return Ok(false);
        };
        let Some(existing) = self.child(key) else {
            return Ok(false);
        };

        if depth + 1 < path.len() {
            return match existing {
                GumpNode::Map(map) => map.delete_at(path, depth + 1, value),
                found => Err(mismatch(path, depth, NodeKind::Map, found.kind())),
            };
        }

        match (existing, value) {
            (_, None) => Ok(self.detach(key).is_some()),
            (GumpNode::Set(set), Some(value)) => Ok(set.delete(value)),
            (found, Some(_)) => Err(mismatch(path, depth, NodeKind::Set, found.kind())),
        }
    }

    /// Unwires and removes the child at `key`, firing a `Delete` event.
    fn detach(&self, key: &K) -> Option<GumpNode<K, V>> {
        let (slot, count) = {
            let mut state = self.inner.state.borrow_mut();
            let slot = state.children.remove(key)?;
            let source = slot.node.source_id();
            if let Some(keys) = state.child_to_key.get_mut(&source) {
                keys.retain(|k| k != key);
                if keys.is_empty() {
                    state.child_to_key.remove(&source);
                }
            }
            let count = slot.node.len();
            state.apply(EventKind::Delete, count);
            (slot, count)
        };
        slot.node.unsubscribe(slot.listener);

        debug!(key = ?key, kind = %slot.node.kind(), count, "detached container");
        self.inner.events.emit(
            EventKind::Delete,
            MapEvent {
                path: GumpPath::single(key.clone()),
                change: Change::Node(slot.node.clone()),
                count,
            },
        );
        Some(slot.node)
    }

    /// Detaches every child, returning the leaf values that were stored.
    ///
    /// Fires one `Clear` event with an empty path if the map had children.
    pub fn clear(&self) -> Vec<V> {
        let (slots, previous) = {
            let mut state = self.inner.state.borrow_mut();
            let slots: Vec<ChildSlot<K, V>> =
                state.children.drain().map(|(_, slot)| slot).collect();
            state.child_to_key.clear();
            (slots, std::mem::take(&mut state.size))
        };
        if slots.is_empty() {
            return Vec::new();
        }

        let mut removed = Vec::with_capacity(previous);
        for slot in &slots {
            slot.node.unsubscribe(slot.listener);
            removed.extend(slot.node.leaf_values());
        }

        debug!(children = slots.len(), count = previous, "cleared map");
        self.inner.events.emit(
            EventKind::Clear,
            MapEvent {
                path: GumpPath::empty(),
                change: Change::Values(removed.clone()),
                count: previous,
            },
        );
        removed
    }

    /// Clears the container at `path` (this map for the empty path).
    ///
    /// The container itself stays in place.
    pub fn clear_at(&self, path: impl ToGumpPath<K>) -> Vec<V> {
        match self.get(path) {
            Some(GumpNode::Map(map)) => map.clear(),
            Some(GumpNode::Set(set)) => set.clear(),
            None => Vec::new(),
        }
    }

    /// Recursively removes every child container that holds no value.
    ///
    /// Returns how many containers were removed; a second call returns 0.
    pub fn purge_empty_containers(&self) -> usize {
        let mut purged = 0;
        for (key, node) in self.children_snapshot() {
            if node.is_empty() {
                if self.detach(&key).is_some() {
                    purged += 1;
                }
            } else if let GumpNode::Map(map) = node {
                purged += map.purge_empty_containers();
            }
        }
        purged
    }

    /// Returns the container at `path`, or this map for the empty path.
    pub fn get(&self, path: impl ToGumpPath<K>) -> Option<GumpNode<K, V>> {
        let path = path.to_gump_path();
        self.get_at(&path, 0)
    }

    fn get_at(&self, path: &GumpPath<K>, depth: usize) -> Option<GumpNode<K, V>> {
        let Some(key) = path.key_at(depth) else {
            return Some(GumpNode::Map(self.clone()));
        };
        match self.child(key)? {
            GumpNode::Map(map) => map.get_at(path, depth + 1),
            GumpNode::Set(set) if depth + 1 == path.len() => Some(GumpNode::Set(set)),
            GumpNode::Set(_) => None,
        }
    }

    /// The map at `path`, if there is one.
    pub fn get_map(&self, path: impl ToGumpPath<K>) -> Option<GumpMap<K, V>> {
        match self.get(path)? {
            GumpNode::Map(map) => Some(map),
            GumpNode::Set(_) => None,
        }
    }

    /// The set at `path`, if there is one.
    pub fn get_set(&self, path: impl ToGumpPath<K>) -> Option<GumpSet<V>> {
        match self.get(path)? {
            GumpNode::Set(set) => Some(set),
            GumpNode::Map(_) => None,
        }
    }

    /// Returns `true` if a container exists at `path`.
    pub fn has(&self, path: impl ToGumpPath<K>) -> bool {
        self.get(path).is_some()
    }

    /// Returns `true` if the set at `path` contains `value`.
    pub fn has_value(&self, path: impl ToGumpPath<K>, value: &V) -> bool {
        self.get_set(path).is_some_and(|set| set.has(value))
    }

    /// Replaces `old` by `new` in the set at `path`.
    ///
    /// Returns `Ok(false)` without touching anything if `old` is absent.
    pub fn update_with_literal(&self, path: impl ToGumpPath<K>, old: &V, new: V) -> Result<bool> {
        let path = path.to_gump_path();
        Ok(self
            .terminal_set(&path, 0)?
            .is_some_and(|set| set.update_with_literal(old, new)))
    }

    /// Replaces `value` by `f(value)` in the set at `path`.
    ///
    /// Returns `Ok(false)` without touching anything if `value` is absent.
    pub fn update_with_function<F>(&self, path: impl ToGumpPath<K>, value: &V, f: F) -> Result<bool>
    where
        F: FnOnce(&V) -> V,
    {
        let path = path.to_gump_path();
        Ok(self
            .terminal_set(&path, 0)?
            .is_some_and(|set| set.update_with_function(value, f)))
    }

    /// The set at the end of `path`, walking it the way `delete_at` does.
    fn terminal_set(&self, path: &GumpPath<K>, depth: usize) -> Result<Option<GumpSet<V>>> {
        let Some(key) = path.key_at(depth) else {
            return Err(mismatch(path, depth, NodeKind::Set, NodeKind::Map));
        };
        let Some(existing) = self.child(key) else {
            return Ok(None);
        };

        if depth + 1 < path.len() {
            return match existing {
                GumpNode::Map(map) => map.terminal_set(path, depth + 1),
                found => Err(mismatch(path, depth, NodeKind::Map, found.kind())),
            };
        }

        match existing {
            GumpNode::Set(set) => Ok(Some(set)),
            found => Err(mismatch(path, depth, NodeKind::Set, found.kind())),
        }
    }

    /// Every `(path, value)` pair, one per stored value.
    pub fn entries(&self) -> std::vec::IntoIter<(GumpPath<K>, V)> {
        self.collect_entries(ResolveOptions::new())
            .into_iter()
            .filter_map(|(path, item)| item.into_value().map(|value| (path, value)))
            .collect::<Vec<_>>()
            .into_iter()
    }

    /// `(path, item)` pairs, descending as far as `options` allow.
    pub fn entries_with(
        &self,
        options: ResolveOptions,
    ) -> std::vec::IntoIter<(GumpPath<K>, Resolved<K, V>)> {
        self.collect_entries(options).into_iter()
    }

    fn collect_entries(&self, options: ResolveOptions) -> Vec<(GumpPath<K>, Resolved<K, V>)> {
        let mut entries = Vec::new();
        for (key, node) in self.children_snapshot() {
            match node {
                GumpNode::Map(map) if options.resolve_maps => {
                    for (tail, item) in map.collect_entries(options) {
                        entries.push((tail.prepend(key.clone()), item));
                    }
                }
                GumpNode::Set(set) if options.resolve_sets => {
                    for value in set.values() {
                        entries.push((GumpPath::single(key.clone()), Resolved::Value(value)));
                    }
                }
                node => entries.push((GumpPath::single(key), Resolved::Node(node))),
            }
        }
        entries
    }

    /// Paths of every leaf set.
    pub fn keys(&self) -> std::vec::IntoIter<GumpPath<K>> {
        self.keys_with(true)
    }

    /// Paths of the containers reached; nested maps are descended into only
    /// if `resolve_maps` is set.
    pub fn keys_with(&self, resolve_maps: bool) -> std::vec::IntoIter<GumpPath<K>> {
        self.collect_keys(resolve_maps).into_iter()
    }

    fn collect_keys(&self, resolve_maps: bool) -> Vec<GumpPath<K>> {
        let mut keys = Vec::new();
        for (key, node) in self.children_snapshot() {
            match node {
                GumpNode::Map(map) if resolve_maps => {
                    keys.extend(
                        map.collect_keys(resolve_maps)
                            .into_iter()
                            .map(|tail| tail.prepend(key.clone())),
                    );
                }
                _ => keys.push(GumpPath::single(key)),
            }
        }
        keys
    }

    /// Every stored value.
    pub fn values(&self) -> std::vec::IntoIter<V> {
        self.entries()
            .map(|(_, value)| value)
            .collect::<Vec<_>>()
            .into_iter()
    }

    /// Values or containers, descending as far as `options` allow.
    pub fn values_with(&self, options: ResolveOptions) -> std::vec::IntoIter<Resolved<K, V>> {
        self.collect_entries(options)
            .into_iter()
            .map(|(_, item)| item)
            .collect::<Vec<_>>()
            .into_iter()
    }

    /// Returns `true` if both handles point to the same map.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn child(&self, key: &K) -> Option<GumpNode<K, V>> {
        self.inner
            .state
            .borrow()
            .children
            .get(key)
            .map(|slot| slot.node.clone())
    }

    fn children_snapshot(&self) -> Vec<(K, GumpNode<K, V>)> {
        self.inner
            .state
            .borrow()
            .children
            .iter()
            .map(|(key, slot)| (key.clone(), slot.node.clone()))
            .collect()
    }
}

fn describe<K: fmt::Debug>(path: &GumpPath<K>, depth: usize) -> String {
    let end = (depth + 1).min(path.len());
    format!("{:?}", &path.keys()[..end])
}

fn mismatch<K: fmt::Debug>(
    path: &GumpPath<K>,
    depth: usize,
    expected: NodeKind,
    found: NodeKind,
) -> crate::Error {
    let path = describe(path, depth);
    debug!(%path, %expected, %found, "container type mismatch");
    GumpError::TypeMismatch {
        path,
        expected,
        found,
    }
    .into()
}

impl<K: Element, V: Element> Observable for GumpMap<K, V> {
    type Data = MapEvent<K, V>;

    fn event_manager(&self) -> &EventManager<Self::Data> {
        &self.inner.events
    }
}

impl<K, V> Clone for GumpMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<K: Element, V: Element> Default for GumpMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Element, V: Element> IntoIterator for &GumpMap<K, V> {
    type Item = (GumpPath<K>, V);
    type IntoIter = std::vec::IntoIter<(GumpPath<K>, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for GumpMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_map()
            .entries(state.children.iter().map(|(key, slot)| (key, &slot.node)))
            .finish()
    }
}
