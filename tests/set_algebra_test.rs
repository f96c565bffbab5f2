//! Randomized checks of the skip-pointer set operations against a naive model.

use std::collections::BTreeSet;

use dcsearch::query::set_ops::{intersect, intersect_not, negate, union};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_list(rng: &mut StdRng, max_len: usize, max_id: u64) -> Vec<u64> {
    let len = rng.random_range(0..=max_len);
    let set: BTreeSet<u64> = (0..len).map(|_| rng.random_range(0..max_id)).collect();
    set.into_iter().collect()
}

fn model(list: &[u64]) -> BTreeSet<u64> {
    list.iter().copied().collect()
}

fn collect(set: impl IntoIterator<Item = u64>) -> Vec<u64> {
    set.into_iter().collect()
}

#[test]
fn test_operations_match_set_model() {
    let mut rng = StdRng::seed_from_u64(42);

    for round in 0..500 {
        // Skewed sizes exercise the skip pointers on the long side.
        let max_id = rng.random_range(1..2_000);
        let a = random_list(&mut rng, 400, max_id);
        let b = random_list(&mut rng, 20, max_id);
        let (ma, mb) = (model(&a), model(&b));

        assert_eq!(intersect(&a, &b), collect(ma.intersection(&mb).copied()), "round {round}");
        assert_eq!(intersect(&b, &a), collect(ma.intersection(&mb).copied()), "round {round}");
        assert_eq!(union(&a, &b), collect(ma.union(&mb).copied()), "round {round}");
        assert_eq!(intersect_not(&a, &b), collect(ma.difference(&mb).copied()), "round {round}");
        assert_eq!(intersect_not(&b, &a), collect(mb.difference(&ma).copied()), "round {round}");
    }
}

#[test]
fn test_negation_laws() {
    let mut rng = StdRng::seed_from_u64(1234);

    for _ in 0..200 {
        let universe = random_list(&mut rng, 300, 1_000);
        let a = intersect(&random_list(&mut rng, 300, 1_000), &universe);
        let b = intersect(&random_list(&mut rng, 300, 1_000), &universe);

        let not_a = negate(&a, &universe);
        assert!(intersect(&a, &not_a).is_empty());
        assert_eq!(union(&a, &not_a), universe);
        assert_eq!(negate(&not_a, &universe), a);

        // De Morgan.
        assert_eq!(
            negate(&union(&a, &b), &universe),
            intersect(&not_a, &negate(&b, &universe))
        );
        assert_eq!(
            negate(&intersect(&a, &b), &universe),
            union(&not_a, &negate(&b, &universe))
        );
        assert_eq!(intersect_not(&a, &b), intersect(&a, &negate(&b, &universe)));
    }
}

#[test]
fn test_results_are_strictly_increasing() {
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..100 {
        let a = random_list(&mut rng, 200, 500);
        let b = random_list(&mut rng, 200, 500);
        for result in [intersect(&a, &b), union(&a, &b), intersect_not(&a, &b)] {
            assert!(result.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
