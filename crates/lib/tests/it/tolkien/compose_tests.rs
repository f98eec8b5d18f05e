//! Relation composition

use gumpkit::tolkien::{
    Cardinality, Tolkien1ToNMap, Tolkien1To1Map, TolkienMToNMap, TolkienMap, TolkienRelation,
    compose, compose_pair,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::helpers::*;
use crate::tolkien::helpers::*;

fn random_relation(rng: &mut StdRng, cardinality: Cardinality) -> TolkienRelation<i32, i32> {
    let mut relation = TolkienRelation::with_cardinality(cardinality);
    for _ in 0..12 {
        relation
            .add(rng.gen_range(0..6), rng.gen_range(0..6))
            .unwrap();
    }
    relation
}

#[test]
fn test_one_to_many_then_one_to_one() {
    let left = Tolkien1ToNMap::from_pairs([(1, 2), (1, 3)]).unwrap();
    let right = Tolkien1To1Map::from_pairs([(2, "a"), (3, "b")]).unwrap();

    let composed = compose_pair(&left, &right).unwrap();

    assert_eq!(composed.cardinality(), Cardinality::OneToMany);
    assert!(matches!(composed, TolkienRelation::OneToMany(_)));
    assert_eq!(sorted(composed.entries()), vec![(1, "a"), (1, "b")]);
}

#[test]
fn test_compose_sequence_uses_widest_cardinality() {
    let maps: Vec<TolkienRelation<i32, i32>> = vec![
        Tolkien1To1Map::from_pairs([(1, 2)]).unwrap().into(),
        TolkienMToNMap::from_pairs([(2, 3), (2, 4)]).unwrap().into(),
        Tolkien1ToNMap::from_pairs([(3, 5), (4, 6)]).unwrap().into(),
    ];

    let composed = compose(&maps).unwrap().expect("non-empty input");

    assert_eq!(composed.cardinality(), Cardinality::ManyToMany);
    assert_eq!(sorted(composed.entries()), vec![(1, 5), (1, 6)]);
}

#[test]
fn test_compose_single_map_copies_it() {
    let only = Tolkien1ToNMap::from_pairs([(1, 2), (1, 3)]).unwrap();

    let composed = compose([&only]).unwrap().unwrap();

    assert_eq!(composed.cardinality(), Cardinality::OneToMany);
    assert_eq!(sorted(composed.entries()), sorted(only.entries()));
}

#[test]
fn test_composition_is_associative() {
    let mut rng = StdRng::seed_from_u64(2024);

    for _ in 0..20 {
        let [r1, r2, r3] = [0, 1, 2].map(|_| {
            let cardinality = ALL_CARDINALITIES[rng.gen_range(0..3)];
            random_relation(&mut rng, cardinality)
        });

        let left = compose_pair(&compose_pair(&r1, &r2).unwrap(), &r3).unwrap();
        let right = compose_pair(&r1, &compose_pair(&r2, &r3).unwrap()).unwrap();

        assert_eq!(left.cardinality(), right.cardinality());
        assert_eq!(sorted(left.entries()), sorted(right.entries()));
        assert_bidirectional(&left);
    }
}
