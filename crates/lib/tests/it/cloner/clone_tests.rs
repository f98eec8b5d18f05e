use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use gumpkit::cloner::{Cloner, Value, clone_value};
use regex::Regex;
use serde_json::json;

/// Assert that no container reachable from `copy` is shared with `original`.
fn assert_disjoint(original: &Value, copy: &Value) {
    let mut originals = HashSet::new();
    collect_identities(original, &mut originals);
    let mut copies = HashSet::new();
    collect_identities(copy, &mut copies);
    assert!(
        originals.is_disjoint(&copies),
        "copy shares containers with the original"
    );
}

fn collect_identities(value: &Value, seen: &mut HashSet<usize>) {
    let Some(id) = value.identity() else {
        return;
    };
    if !seen.insert(id) {
        return;
    }
    if let Some(items) = value.as_array() {
        for item in items.borrow().iter() {
            collect_identities(item, seen);
        }
    }
    if let Some(fields) = value.as_object() {
        for item in fields.borrow().values() {
            collect_identities(item, seen);
        }
    }
}

#[test]
fn test_acyclic_clone_is_equal_but_disjoint() {
    let original = Value::from(json!({
        "name": "root",
        "tags": ["a", "b"],
        "nested": {"n": 1, "f": 1.5, "ok": true, "none": null}
    }));

    let copy = clone_value(&original).unwrap();

    assert!(copy.deep_eq(&original));
    assert_disjoint(&original, &copy);
}

#[test]
fn test_self_containing_array() {
    let v = Value::array([Value::Int(1)]);
    v.push(v.clone());

    let copy = clone_value(&v).unwrap();

    assert!(!copy.ptr_eq(&v));
    assert!(copy.get_index(1).unwrap().ptr_eq(&copy));
    assert!(matches!(copy.get_index(0), Some(Value::Int(1))));
    assert!(copy.deep_eq(&v));
}

#[test]
fn test_self_referencing_object() {
    let v = Value::object([("name", Value::from("loop"))]);
    v.insert("self", v.clone());

    let copy = clone_value(&v).unwrap();

    assert!(copy.get_field("self").unwrap().ptr_eq(&copy));
    assert_disjoint(&v, &copy);
}

#[test]
fn test_shared_references_stay_shared() {
    let shared = Value::array([Value::Int(1)]);
    let root = Value::object([("left", shared.clone()), ("right", shared.clone())]);

    let copy = clone_value(&root).unwrap();

    let left = copy.get_field("left").unwrap();
    let right = copy.get_field("right").unwrap();
    assert!(left.ptr_eq(&right));
    assert!(!left.ptr_eq(&shared));
}

#[test]
fn test_mutual_cycle() {
    let a = Value::object([("name", Value::from("a"))]);
    let b = Value::object([("name", Value::from("b"))]);
    a.insert("peer", b.clone());
    b.insert("peer", a.clone());

    let copy = clone_value(&a).unwrap();
    let peer = copy.get_field("peer").unwrap();

    assert!(peer.get_field("peer").unwrap().ptr_eq(&copy));
    assert!(!peer.ptr_eq(&b));
}

#[test]
fn test_dates_and_regexes_keep_their_value() {
    let date = Utc.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).unwrap();
    let original = Value::array([Value::from(date), Value::from(Regex::new("^a+$").unwrap())]);

    let copy = clone_value(&original).unwrap();

    match (copy.get_index(0), copy.get_index(1)) {
        (Some(Value::Date(d)), Some(Value::Regex(re))) => {
            assert_eq!(d, date);
            assert!(re.is_match("aaa"));
            assert_eq!(re.as_str(), "^a+$");
        }
        other => panic!("Unexpected clone result: {other:?}"),
    }
}

#[test]
fn test_opaque_value_is_rejected() {
    struct Handle;

    let original = Value::object([("ok", Value::Int(1)), ("bad", Value::opaque(Handle))]);
    let mut cloner = Cloner::new();

    let err = cloner.clone_value(&original).unwrap_err();

    assert!(err.is_unsupported());
    assert!(err.to_string().contains("Handle"));
    assert_eq!(cloner.depth(), 0);
}

#[test]
fn test_cloner_is_reusable_after_error() {
    let mut cloner = Cloner::new();
    let shared = Value::array([]);

    assert!(cloner.clone_value(&Value::opaque(3_u8)).is_err());
    let first = cloner.clone_value(&shared).unwrap();
    let second = cloner.clone_value(&shared).unwrap();

    assert!(!first.ptr_eq(&second));
}
