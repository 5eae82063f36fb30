// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use std::sync::Arc;

use decoy_core::{
    synthesize, Arg, Behavior, CallRecord, Faked, StructuralComparer, Times, TypeHandle, Value,
};
use decoy_dry_tests::fixtures::scientific;
use decoy_dry_tests::{calculator, named, strict_calculator};
use proptest::prelude::*;

fn interface_pool() -> [TypeHandle; 4] {
    [
        calculator(),
        named(),
        scientific(),
        TypeHandle::faked(),
    ]
}

proptest! {
    #[test]
    fn exactly_accepts_only_its_count(k in 0usize..50, n in 0usize..50) {
        prop_assert_eq!(Times::exactly(k).is_in_range(n), n == k);
    }

    #[test]
    fn between_is_an_inclusive_interval(a in 0usize..50, b in 0usize..50, n in 0usize..60) {
        prop_assert_eq!(Times::between(a, b).is_in_range(n), a <= n && n <= b);
        prop_assert_eq!(Times::at_least(a).is_in_range(n), n >= a);
        prop_assert_eq!(Times::at_most(a).is_in_range(n), n <= a);
    }

    #[test]
    fn literal_patterns_match_exactly_equal_calls(
        name in "[a-c]{1,2}",
        other in "[a-c]{1,2}",
        expected in prop::collection::vec(any::<i32>(), 0..4),
        actual in prop::collection::vec(any::<i32>(), 0..4),
    ) {
        let pattern = expected
            .iter()
            .fold(CallRecord::new(name.clone()), |record, x| record.arg(*x));
        let values: Vec<Value> = actual.iter().copied().map(Value::of).collect();
        let observed = CallRecord::observed(&other, &[], &values);
        let first = pattern.matches(&observed, &StructuralComparer);
        let second = pattern.matches(&observed, &StructuralComparer);
        prop_assert_eq!(first, second);
        prop_assert_eq!(first, name == other && expected == actual);
    }

    #[test]
    fn any_matchers_match_every_value_of_the_right_arity(
        actual in prop::collection::vec(any::<i32>(), 0..4),
        arity in 0usize..4,
    ) {
        let pattern = (0..arity).fold(CallRecord::new("calc"), |record, _| {
            record.matcher(Arg::any::<i32>())
        });
        let values: Vec<Value> = actual.iter().copied().map(Value::of).collect();
        let observed = CallRecord::observed("calc", &[], &values);
        prop_assert_eq!(
            pattern.matches(&observed, &StructuralComparer),
            arity == actual.len()
        );
    }

    #[test]
    fn most_recent_overlapping_setup_wins(
        returns in prop::collection::vec(any::<i32>(), 1..6),
        x in any::<i32>(),
    ) {
        let fake = strict_calculator();
        for value in &returns {
            fake.setup(
                |arg, f| f.call("calc", vec![Value::of(arg.any::<i32>())]),
                Behavior::returns(*value),
            )
            .expect("setup");
        }
        let result = fake.call("calc", vec![Value::of(x)]).expect("calc");
        prop_assert_eq!(result, Value::of(*returns.last().expect("non-empty")));
    }

    #[test]
    fn set_equal_interface_lists_synthesize_once(
        (picks, shuffled) in prop::collection::vec(0usize..4, 0..6)
            .prop_flat_map(|picks| (Just(picks.clone()), Just(picks).prop_shuffle())),
    ) {
        let pool = interface_pool();
        let first: Vec<TypeHandle> = picks.iter().map(|i| pool[*i].clone()).collect();
        let second: Vec<TypeHandle> = shuffled.iter().map(|i| pool[*i].clone()).collect();
        let a = synthesize(None, &first).expect("first");
        let b = synthesize(None, &second).expect("second");
        prop_assert!(Arc::ptr_eq(&a, &b));
    }
}
