//! Randomized bidirectional consistency checks for every cardinality

use gumpkit::tolkien::{PairSelector, TolkienMap, TolkienRelation};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::tolkien::helpers::*;

#[test]
fn test_random_operations_keep_directions_in_sync() {
    for cardinality in ALL_CARDINALITIES {
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut map: TolkienRelation<i32, i32> = TolkienRelation::with_cardinality(cardinality);

            for _ in 0..200 {
                let x = rng.gen_range(0..6);
                let y = rng.gen_range(0..6);
                match rng.gen_range(0..6) {
                    0 | 1 => {
                        map.add(x, y).unwrap();
                        assert!(map.has_pair(&x, &y));
                    }
                    2 => {
                        map.set(x, y).unwrap();
                        assert_eq!(map.convert_x_to_y(&x), vec![y]);
                        assert_eq!(map.convert_y_to_x(&y), vec![x]);
                    }
                    3 => {
                        map.delete(PairSelector::X(x)).unwrap();
                        assert!(!map.has_x(&x));
                    }
                    4 => {
                        map.delete(PairSelector::Y(y)).unwrap();
                        assert!(!map.has_y(&y));
                    }
                    _ => {
                        map.delete(PairSelector::Pair(x, y)).unwrap();
                        assert!(!map.has_pair(&x, &y));
                    }
                }
                assert_bidirectional(&map);
            }
        }
    }
}

#[test]
fn test_delete_x_only_drops_associations_with_that_x() {
    for cardinality in ALL_CARDINALITIES {
        let mut map: TolkienRelation<i32, i32> = TolkienRelation::with_cardinality(cardinality);
        for (x, y) in [(1, 10), (1, 11), (2, 10), (2, 12), (3, 13)] {
            map.add(x, y).unwrap();
        }
        let survivors: Vec<(i32, i32)> = map
            .entries()
            .into_iter()
            .filter(|(x, _)| *x != 2)
            .collect();

        map.delete(PairSelector::X(2)).unwrap();

        assert!(!map.has_x(&2), "{cardinality}: x survived its delete");
        for (x, y) in &survivors {
            assert!(map.has_pair(x, y), "{cardinality}: lost unrelated pair ({x}, {y})");
        }
        assert_bidirectional(&map);
    }
}

#[test]
fn test_pairs_survive_until_deleted() {
    for cardinality in ALL_CARDINALITIES {
        let mut map: TolkienRelation<i32, i32> = TolkienRelation::with_cardinality(cardinality);
        map.add(1, 1).unwrap();
        map.add(2, 2).unwrap();

        assert!(map.has_pair(&1, &1));
        assert!(map.has_pair(&2, &2));

        map.delete(PairSelector::Y(2)).unwrap();
        assert!(map.has_pair(&1, &1));
        assert!(!map.has_either(&2, &2));
    }
}
