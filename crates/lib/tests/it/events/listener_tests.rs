use std::{cell::Cell, rc::Rc};

use gumpkit::{
    GumpMap, GumpSet,
    events::{Event, EventKind, Observable},
    gump::{MapEvent, SetChange},
};

use crate::helpers::*;

#[test]
fn test_kind_filter_on_container() {
    let set: GumpSet<i32> = GumpSet::new();
    let deletes = Rc::new(Cell::new(0));

    let counter = Rc::clone(&deletes);
    set.add_listener(EventKind::Delete, move |_: &Event<SetChange<i32>>| {
        counter.set(counter.get() + 1);
    });

    set.add(1);
    set.add(2);
    set.delete(&1);
    set.clear();

    assert_eq!(deletes.get(), 1);
}

#[test]
fn test_events_carry_source_of_firing_container() {
    let map: GumpMap<String, i32> = GumpMap::new();
    map.add("a.b", 1).unwrap();
    let inner = map.get_map("a").unwrap();
    let set = map.get_set("a.b").unwrap();

    let root_log = record_events(&map);
    let inner_log = record_events(&inner);
    let set_log = record_events(&set);

    map.add("a.b", 2).unwrap();

    assert_eq!(set_log.borrow()[0].source, set.source_id());
    assert_eq!(inner_log.borrow()[0].source, inner.source_id());
    assert_eq!(root_log.borrow()[0].source, map.source_id());
    assert_ne!(map.source_id(), inner.source_id());
}

#[test]
fn test_removed_listener_is_silent() {
    let map: GumpMap<String, i32> = GumpMap::new();
    let calls = Rc::new(Cell::new(0));

    let counter = Rc::clone(&calls);
    let id = map.add_listener([EventKind::Add, EventKind::Delete], move |_: &Event<MapEvent<String, i32>>| {
        counter.set(counter.get() + 1);
    });

    map.add("x", 1).unwrap();
    assert!(map.remove_listener_kinds(id, &[EventKind::Add]));
    map.add("x", 2).unwrap();
    map.delete_value("x", &1).unwrap();
    assert!(map.remove_listener(id));
    map.delete_value("x", &2).unwrap();

    assert_eq!(calls.get(), 2);
    assert!(!map.remove_listener(id));
}

#[test]
fn test_listener_may_mutate_the_container() {
    let set: GumpSet<i32> = GumpSet::new();
    let mirror = set.clone();

    // Every odd value also inserts its double
    set.add_listener(EventKind::Add, move |event: &Event<SetChange<i32>>| {
        if let SetChange::Value(v) = event.data {
            if v % 2 == 1 {
                mirror.add(v * 2);
            }
        }
    });

    set.add(3);
    assert_eq!(sorted(set.values()), vec![3, 6]);
}
