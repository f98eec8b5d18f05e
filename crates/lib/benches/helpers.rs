//! Shared helpers for benchmark tests

use gumpkit::{
    GumpMap, GumpPath,
    tolkien::{TolkienMToNMap, TolkienMap},
};

/// Path `group_{i % fanout}.item_{i}`, spreading entries over `fanout` branches.
pub fn entry_path(i: usize, fanout: usize) -> GumpPath<String> {
    GumpPath::new([format!("group_{}", i % fanout), format!("item_{i}")])
}

/// Creates a map pre-populated with `entry_count` values spread over 16 branches.
pub fn setup_map_with_entries(entry_count: usize) -> GumpMap<String, usize> {
    let map = GumpMap::new();
    for i in 0..entry_count {
        map.add(entry_path(i, 16), i).expect("Failed to add entry");
    }
    map
}

/// Creates an M:N relation linking every x in `0..size` to `fanout` ys.
pub fn setup_relation(size: usize, fanout: usize) -> TolkienMToNMap<usize, usize> {
    let mut relation = TolkienMToNMap::new();
    for x in 0..size {
        for k in 0..fanout {
            relation
                .add(x, (x * fanout + k) % size)
                .expect("Failed to add pair");
        }
    }
    relation
}
