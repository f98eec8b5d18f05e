//! Typed publish/subscribe for the observable containers.
//!
//! Every stateful container in this crate owns an [`EventManager`] and
//! announces its mutations through it. Listeners are plain closures that are
//! invoked synchronously, in registration order, from inside the mutating
//! call.
//!
//! # Core Types
//!
//! - [`Event`] - What happened (`kind`), who fired it (`source`) and a typed payload (`data`)
//! - [`EventManager`] - Listener registry owned by an observable object
//! - [`Observable`] - Trait giving containers a uniform listener API
//!
//! # Re-entrancy
//!
//! The manager snapshots the matching listeners before invoking them, so a
//! listener may call back into the container that fired the event, register
//! or remove listeners, or fire further events. There is no lock: a listener
//! that re-triggers the event it is handling recurses without bound.
//!
//! ```
//! use gumpkit::events::{EventKind, EventManager};
//! use std::{cell::RefCell, rc::Rc};
//!
//! let manager: EventManager<u32> = EventManager::new();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let sink = Rc::clone(&seen);
//! manager.add_listener(EventKind::Add, move |e| sink.borrow_mut().push(e.data));
//!
//! manager.emit(EventKind::Add, 7);
//! manager.emit(EventKind::Delete, 8);
//! assert_eq!(*seen.borrow(), vec![7]);
//! ```

use std::{
    cell::RefCell,
    collections::HashSet,
    fmt,
    rc::Rc,
    sync::atomic::{AtomicU64, Ordering},
};

use serde::{Deserialize, Serialize};

static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an event source.
///
/// Each [`EventManager`] draws one on construction. Containers use it to
/// recognise which of their children fired a bubbled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u64);

impl SourceId {
    fn next() -> Self {
        SourceId(NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric id.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source#{}", self.0)
    }
}

/// The type of a mutation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Something was inserted.
    Add,
    /// Something was removed.
    Delete,
    /// A container was emptied in one step.
    Clear,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: [EventKind; 3] = [EventKind::Add, EventKind::Delete, EventKind::Clear];

    /// Lowercase name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Add => "add",
            EventKind::Delete => "delete",
            EventKind::Clear => "clear",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which event kinds a listener is interested in.
///
/// An empty kind list is normalised to [`EventFilter::Any`]: registering
/// without kinds means receiving everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EventFilter {
    /// Receive every event regardless of kind.
    #[default]
    Any,
    /// Receive only the listed kinds.
    Kinds(Vec<EventKind>),
}

impl EventFilter {
    fn into_kinds(self) -> HashSet<EventKind> {
        match self {
            EventFilter::Any => EventKind::ALL.into_iter().collect(),
            EventFilter::Kinds(kinds) if kinds.is_empty() => EventKind::ALL.into_iter().collect(),
            EventFilter::Kinds(kinds) => kinds.into_iter().collect(),
        }
    }
}

impl From<EventKind> for EventFilter {
    fn from(kind: EventKind) -> Self {
        EventFilter::Kinds(vec![kind])
    }
}

impl<const N: usize> From<[EventKind; N]> for EventFilter {
    fn from(kinds: [EventKind; N]) -> Self {
        EventFilter::Kinds(kinds.to_vec())
    }
}

impl From<&[EventKind]> for EventFilter {
    fn from(kinds: &[EventKind]) -> Self {
        EventFilter::Kinds(kinds.to_vec())
    }
}

impl From<Vec<EventKind>> for EventFilter {
    fn from(kinds: Vec<EventKind>) -> Self {
        EventFilter::Kinds(kinds)
    }
}

/// An event fired by an observable object.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<D> {
    /// The object that fired this event.
    pub source: SourceId,
    /// The type of this event.
    pub kind: EventKind,
    /// Kind-specific payload.
    pub data: D,
}

impl<D> Event<D> {
    /// Creates a new event.
    pub fn new(source: SourceId, kind: EventKind, data: D) -> Self {
        Self { source, kind, data }
    }
}

/// Handle identifying a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<D> = Rc<dyn Fn(&Event<D>)>;

struct Registration<D> {
    id: ListenerId,
    kinds: HashSet<EventKind>,
    listener: Listener<D>,
}

struct Registry<D> {
    next_id: u64,
    registrations: Vec<Registration<D>>,
}

/// Manages the listeners of one observable object.
pub struct EventManager<D> {
    source: SourceId,
    registry: RefCell<Registry<D>>,
}

impl<D> EventManager<D> {
    /// Creates a manager with a fresh [`SourceId`] and no listeners.
    pub fn new() -> Self {
        Self {
            source: SourceId::next(),
            registry: RefCell::new(Registry {
                next_id: 0,
                registrations: Vec::new(),
            }),
        }
    }

    /// The identity stamped on events emitted through [`EventManager::emit`].
    pub fn source_id(&self) -> SourceId {
        self.source
    }

    /// Registers `listener` for the kinds selected by `filter`.
    pub fn add_listener<F>(&self, filter: impl Into<EventFilter>, listener: F) -> ListenerId
    where
        F: Fn(&Event<D>) + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry.registrations.push(Registration {
            id,
            kinds: filter.into().into_kinds(),
            listener: Rc::new(listener),
        });
        id
    }

    /// Removes a listener completely. Returns `false` if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut registry = self.registry.borrow_mut();
        let before = registry.registrations.len();
        registry.registrations.retain(|r| r.id != id);
        registry.registrations.len() != before
    }

    /// Stops `id` from receiving the given kinds.
    ///
    /// A listener left without any kind is removed. Returns `false` if the
    /// listener was not registered.
    pub fn remove_listener_kinds(&self, id: ListenerId, kinds: &[EventKind]) -> bool {
        let mut registry = self.registry.borrow_mut();
        let Some(position) = registry.registrations.iter().position(|r| r.id == id) else {
            return false;
        };
        let registration = &mut registry.registrations[position];
        for kind in kinds {
            registration.kinds.remove(kind);
        }
        if registration.kinds.is_empty() {
            registry.registrations.remove(position);
        }
        true
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().registrations.len()
    }

    /// Invokes every listener interested in `event.kind`.
    pub fn fire_event(&self, event: &Event<D>) {
        let listeners: Vec<Listener<D>> = self
            .registry
            .borrow()
            .registrations
            .iter()
            .filter(|r| r.kinds.contains(&event.kind))
            .map(|r| Rc::clone(&r.listener))
            .collect();

        for listener in listeners {
            listener(event);
        }
    }

    /// Builds an event sourced from this manager and fires it.
    pub fn emit(&self, kind: EventKind, data: D) {
        self.fire_event(&Event::new(self.source, kind, data));
    }
}

impl<D> Default for EventManager<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> fmt::Debug for EventManager<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventManager")
            .field("source", &self.source)
            .field(
                "listeners",
                &format!("<{} listeners>", self.listener_count()),
            )
            .finish()
    }
}

/// An object that allows listeners to be attached to it.
///
/// Implementors only expose their [`EventManager`]; the listener API is
/// provided.
pub trait Observable {
    /// Payload carried by this object's events.
    type Data;

    /// The manager holding this object's listeners.
    fn event_manager(&self) -> &EventManager<Self::Data>;

    /// Identity stamped on this object's events.
    fn source_id(&self) -> SourceId {
        self.event_manager().source_id()
    }

    /// Registers a listener. See [`EventManager::add_listener`].
    fn add_listener<F>(&self, filter: impl Into<EventFilter>, listener: F) -> ListenerId
    where
        F: Fn(&Event<Self::Data>) + 'static,
        Self: Sized,
    {
        self.event_manager().add_listener(filter, listener)
    }

    /// Removes a listener. See [`EventManager::remove_listener`].
    fn remove_listener(&self, id: ListenerId) -> bool {
        self.event_manager().remove_listener(id)
    }

    /// Narrows a listener. See [`EventManager::remove_listener_kinds`].
    fn remove_listener_kinds(&self, id: ListenerId, kinds: &[EventKind]) -> bool {
        self.event_manager().remove_listener_kinds(id, kinds)
    }

    /// Notifies all listeners interested in `event`.
    fn fire_event(&self, event: &Event<Self::Data>) {
        self.event_manager().fire_event(event);
    }
}
