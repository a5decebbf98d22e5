use disambig_plan::{ActionLabel, Plan, PlanHash};
use proptest::prelude::*;

fn action() -> impl Strategy<Value = String> {
    "[a-d]{1,3}( [a-d]{1,2})?"
}

proptest! {
    #[test]
    fn prop_hash_identity_matches_sequence_identity(
        a in proptest::collection::vec(action(), 0..6),
        b in proptest::collection::vec(action(), 0..6),
    ) {
        let pa = Plan::from_actions(&a, a.len() as u64).unwrap();
        let pb = Plan::from_actions(&b, b.len() as u64).unwrap();

        // Invariant: hash equality iff identical normalized sequences
        prop_assert_eq!(pa.hash() == pb.hash(), pa.actions() == pb.actions());
    }

    #[test]
    fn prop_hash_is_deterministic(a in proptest::collection::vec(action(), 0..8)) {
        let labels: Vec<ActionLabel> = a.iter().map(|s| ActionLabel::normalize(s).unwrap()).collect();
        prop_assert_eq!(PlanHash::of_actions(&labels), PlanHash::of_actions(&labels));
    }

    #[test]
    fn prop_swapping_distinct_actions_changes_hash(
        a in proptest::collection::vec(action(), 2..6),
        i in 0..6usize,
        j in 0..6usize,
    ) {
        let (i, j) = (i % a.len(), j % a.len());
        let original = Plan::from_actions(&a, 0).unwrap();
        prop_assume!(original.actions()[i] != original.actions()[j]);

        let mut swapped = a.clone();
        swapped.swap(i, j);
        let swapped = Plan::from_actions(&swapped, 0).unwrap();
        prop_assert_ne!(original.hash(), swapped.hash());
    }
}

#[test]
fn test_empty_plan_has_stable_hash() {
    let a = Plan::from_actions(Vec::<&str>::new(), 0).unwrap();
    let b = Plan::from_actions(Vec::<String>::new(), 0).unwrap();
    assert_eq!(a.hash(), b.hash());
    assert!(a.is_empty());
}
