//! Relation map operations and events

use gumpkit::{
    events::EventKind,
    tolkien::{
        Cardinality, PairSelector, RelationEvent, Tolkien1ToNMap, Tolkien1To1Map, TolkienMToNMap,
        TolkienMap,
    },
};

use crate::helpers::*;
use crate::tolkien::helpers::*;

#[test]
fn test_set_replaces_existing_pairing() {
    let mut map = Tolkien1To1Map::from_pairs([("x", "y")]).unwrap();

    map.set("x", "z").unwrap();

    assert!(map.has_pair(&"x", &"z"));
    assert!(!map.has_pair(&"x", &"y"));
    assert!(!map.has_y(&"y"));
    assert_eq!(map.len(), 1);
}

#[test]
fn test_set_replaces_on_many_to_many() {
    let mut map = TolkienMToNMap::from_pairs([(1, 10), (1, 11), (2, 20), (3, 20)]).unwrap();

    map.set(1, 20).unwrap();

    assert_eq!(map.entries(), vec![(1, 20)]);
    assert_bidirectional(&map);
}

#[test]
fn test_add_fires_only_for_new_pairs() {
    let mut map: Tolkien1ToNMap<i32, i32> = Tolkien1ToNMap::new();
    let log = record_events(&map);

    assert!(map.add(1, 10).unwrap());
    assert!(!map.add(1, 10).unwrap());

    let log = log.borrow();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].kind, EventKind::Add);
    assert_eq!(
        log[0].data,
        RelationEvent {
            x: Some(1),
            y: Some(10),
            pairs: vec![(1, 10)],
        }
    );
}

#[test]
fn test_delete_fires_with_removed_pairs() {
    let mut map = TolkienMToNMap::from_pairs([(1, 10), (1, 11), (2, 10)]).unwrap();
    let log = record_events(&map);

    assert!(map.delete(PairSelector::X(9)).unwrap().is_empty());
    let removed = map.delete(PairSelector::X(1)).unwrap();

    let log = log.borrow();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].kind, EventKind::Delete);
    assert_eq!(log[0].data.x, Some(1));
    assert_eq!(log[0].data.y, None);
    assert_eq!(sorted(log[0].data.pairs.clone()), sorted(removed));
    assert_eq!(log[0].data.pairs.len(), 2);
}

#[test]
fn test_set_reports_evictions() {
    let mut map = Tolkien1To1Map::from_pairs([(1, 'a'), (2, 'b')]).unwrap();
    let log = record_events(&map);

    map.set(1, 'b').unwrap();

    let kinds: Vec<EventKind> = log.borrow().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EventKind::Delete, EventKind::Delete, EventKind::Add]);
    assert_eq!(map.entries(), vec![(1, 'b')]);
}

#[test]
fn test_clear_fires_once_when_non_empty() {
    let mut map = Tolkien1ToNMap::from_pairs([(1, 10), (1, 11)]).unwrap();
    let log = record_events(&map);

    assert_eq!(sorted(map.clear()), vec![(1, 10), (1, 11)]);
    assert!(map.clear().is_empty());

    let log = log.borrow();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].kind, EventKind::Clear);
    assert!(map.is_empty());
    assert!(map.xs().is_empty());
    assert!(map.ys().is_empty());
}

#[test]
fn test_has_selectors() {
    let map = Tolkien1ToNMap::from_pairs([(1, 10)]).unwrap();

    assert!(map.has(&PairSelector::X(1)));
    assert!(map.has(&PairSelector::Y(10)));
    assert!(map.has(&PairSelector::Pair(1, 10)));
    assert!(!map.has(&PairSelector::Pair(1, 11)));
    assert!(map.has_either(&5, &10));
    assert!(!map.has_either(&5, &50));
}

#[test]
fn test_cardinality_serde_and_order() {
    assert!(Cardinality::OneToOne < Cardinality::OneToMany);
    assert!(Cardinality::OneToMany < Cardinality::ManyToMany);
    assert_eq!(
        serde_json::to_string(&Cardinality::OneToMany).unwrap(),
        r#""one_to_many""#
    );
    assert_eq!(Cardinality::ManyToMany.to_string(), "M:N");
}
