use gumpkit::{GumpMap, GumpPath};

use crate::helpers::*;

/// A map with two nested branches and a top-level set:
/// `a.b = {1, 2}`, `a.c = {3}`, `d = {4}`.
pub fn setup_nested_map() -> GumpMap<String, i32> {
    GumpMap::from_entries([("a.b", 1), ("a.b", 2), ("a.c", 3), ("d", 4)])
        .expect("Failed to build nested map")
}

/// Fully resolved entries as sorted `("dotted.path", value)` pairs.
pub fn flat_entries(map: &GumpMap<String, i32>) -> Vec<(String, i32)> {
    sorted(map.entries().map(|(p, v)| (p.to_string(), v)))
}

/// Assert that `map.len()` agrees with fully resolved iteration, for the map
/// and every nested map beneath it.
pub fn assert_size_consistent(map: &GumpMap<String, i32>) {
    assert_eq!(
        map.len(),
        map.entries().count(),
        "size disagrees with iteration: {map:?}"
    );
    for key in map.keys_with(false) {
        if let Some(child) = map.get_map(&key) {
            assert_size_consistent(&child);
        }
    }
}

/// Shorthand for a path of owned string keys.
pub fn keys(parts: &[&str]) -> GumpPath<String> {
    GumpPath::new(parts.iter().map(|s| s.to_string()))
}
