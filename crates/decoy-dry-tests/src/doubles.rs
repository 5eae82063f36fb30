// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rust traits with generated doubles.

use decoy_core::fake;

/// Arithmetic collaborator used by the trait-level tests.
pub trait Calculator {
    /// Transform `x`.
    fn calc(&self, x: i32) -> i32;
    /// Report the most recent label through `label`.
    fn last_label(&self, label: &mut String);
    /// Add `amount` to `total` in place.
    fn accumulate(&self, total: &mut i64, amount: i64);
    /// Clear internal state.
    fn reset(&self);
}

fake! {
    /// Generated double for [`Calculator`].
    pub struct FakeCalculator: Calculator {
        fn calc(&self, x: i32) -> i32;
        fn last_label(&self, #out label: String);
        fn accumulate(&self, #ref total: i64, amount: i64);
        fn reset(&self);
    }
}

/// Time source.
pub trait Clock {
    /// Current tick.
    fn now(&self) -> u64;
}

fake! {
    /// Generated double for [`Clock`].
    pub struct FakeClock: Clock {
        fn now(&self) -> u64;
    }
}

/// Consumer that reads a [`Clock`] twice and returns the elapsed ticks.
pub fn elapsed(clock: &impl Clock) -> u64 {
    let start = clock.now();
    let end = clock.now();
    end.saturating_sub(start)
}
