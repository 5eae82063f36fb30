// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `fake!`-generated doubles used through their Rust traits.

#![allow(missing_docs)]
use std::sync::Arc;

use decoy_core::{Behavior, Faked, Times, Value};
use decoy_dry_tests::doubles::{elapsed, Clock};
use decoy_dry_tests::{log_lines, panic_message, Calculator, FakeCalculator, FakeClock};

#[test]
fn trait_calls_are_routed_through_the_dispatcher() {
    let fake = FakeCalculator::new();
    fake.setup(|arg, f| f.calc(arg.any()), Behavior::returns(7_i32))
        .expect("setup");

    assert_eq!(fake.calc(3), 7);
    assert_eq!(fake.calc(4), 7);
    fake.verify(Times::exactly(2), |arg, f| f.calc(arg.any()))
        .expect("two calls");
    fake.verify(Times::once(), |_, f| f.calc(3)).expect("one with 3");
    assert_eq!(log_lines(&fake.dispatcher().calls()), vec!["calc(3)", "calc(4)"]);
}

#[test]
fn out_parameters_are_written_back() {
    let fake = FakeCalculator::new();
    fake.setup(
        |_, f| f.last_label(&mut String::new()),
        Behavior::new(|args| {
            args.set(0, String::from("X"))?;
            Ok(Value::Null)
        }),
    )
    .expect("setup");

    let mut label = String::from("before");
    fake.last_label(&mut label);
    assert_eq!(label, "X");
}

#[test]
fn out_parameters_left_unset_keep_caller_value() {
    let fake = FakeCalculator::lenient();
    let mut label = String::from("before");
    fake.last_label(&mut label);
    assert_eq!(label, "before");
}

#[test]
fn ref_parameters_are_copied_in_and_out() {
    let fake = FakeCalculator::new();
    fake.setup(
        |arg, f| f.accumulate(&mut arg.any::<i64>(), arg.any()),
        Behavior::new(|args| {
            let total: i64 = args.get(0)?;
            let amount: i64 = args.get(1)?;
            args.set(0, total + amount)?;
            Ok(Value::Null)
        }),
    )
    .expect("setup");

    let mut total = 40_i64;
    fake.accumulate(&mut total, 2);
    fake.accumulate(&mut total, 3);
    assert_eq!(total, 45);
    assert_eq!(
        log_lines(&fake.dispatcher().calls()),
        vec!["accumulate(40, 2)", "accumulate(42, 3)"]
    );
}

#[test]
fn strict_misses_panic_with_the_diagnostic() {
    let fake = FakeCalculator::new();
    let message = panic_message(|| {
        fake.calc(1);
    })
    .expect("strict miss panics");
    assert!(message.starts_with("unmatched call calc(1)"), "{message}");
}

#[test]
fn lenient_doubles_return_defaults() {
    let fake = FakeCalculator::lenient();
    assert_eq!(fake.calc(1), 0);
    fake.reset();
    fake.verify_total(Times::exactly(2)).expect("two calls");
}

#[test]
fn mistyped_behaviors_panic() {
    let fake = FakeCalculator::new();
    fake.setup(
        |arg, f| f.calc(arg.any()),
        Behavior::returns(String::from("seven")),
    )
    .expect("setup");
    let message = panic_message(|| {
        fake.calc(1);
    })
    .expect("type mismatch panics");
    assert!(message.contains("calc"), "{message}");
}

#[test]
fn generated_types_share_one_synthesized_type() {
    let a = FakeCalculator::new();
    let b = FakeCalculator::lenient();
    assert!(Arc::ptr_eq(
        a.object().synthesized_type(),
        b.object().synthesized_type()
    ));
    assert!(a
        .object()
        .synthesized_type()
        .implements(&FakeCalculator::interface_type()));
    assert_ne!(a.object(), b.object());
}

#[test]
fn consumers_see_scripted_sequences() {
    let clock = FakeClock::new();
    clock
        .setup(|_, f| f.now(), Behavior::series([10_u64, 25]))
        .expect("setup");
    assert_eq!(elapsed(&clock), 15);
    assert_eq!(clock.now(), 0);
    clock.verify(Times::exactly(3), |_, f| f.now()).expect("three ticks");
}

#[test]
fn contract_ranges_are_checked_together() {
    let clock = FakeClock::new();
    clock
        .setup(
            |_, f| f.now(),
            Behavior::returns(5_u64).with_times(Times::between(1, 2)),
        )
        .expect("setup");
    clock.verify_all(None).unwrap_err();
    clock.now();
    clock.verify_all(Some(Times::once())).expect("satisfied");
}
