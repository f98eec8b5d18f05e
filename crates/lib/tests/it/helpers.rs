use std::{cell::RefCell, rc::Rc};

use gumpkit::{
    GumpPath,
    events::{Event, EventFilter, Observable},
};

/// Events captured by [`record_events`], in firing order.
pub type EventLog<D> = Rc<RefCell<Vec<Event<D>>>>;

/// Subscribes to every event of `target` and collects them.
pub fn record_events<O>(target: &O) -> EventLog<O::Data>
where
    O: Observable,
    O::Data: Clone + 'static,
{
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    target.add_listener(EventFilter::Any, move |event: &Event<O::Data>| {
        sink.borrow_mut().push(event.clone());
    });
    log
}

/// Collects and sorts, so assertions do not depend on hash iteration order.
pub fn sorted<T: Ord>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut items: Vec<T> = items.into_iter().collect();
    items.sort();
    items
}

/// Parses a dotted path.
pub fn path(s: &str) -> GumpPath<String> {
    GumpPath::from_string(s)
}
