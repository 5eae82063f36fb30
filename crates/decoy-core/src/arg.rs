// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Argument matchers and the per-statement setup scope.
//!
//! Setup statements are written as ordinary calls on the fake:
//!
//! ```
//! use decoy_core::{Behavior, Faked};
//! use decoy_dry_tests::{Calculator, FakeCalculator};
//!
//! let fake = FakeCalculator::new();
//! let contract = fake
//!     .setup(|arg, fake| fake.calc(arg.any()), Behavior::returns(7_i32))
//!     .unwrap();
//! assert_eq!(contract.pattern().to_string(), "calc(any<i32>)");
//! assert_eq!(fake.calc(3), 7);
//! ```
//!
//! `arg.any()` returns a placeholder of the parameter type and queues a
//! matcher. The statement runs against the fake in recording mode and the
//! recorded call is compiled into a pattern by swapping each placeholder for
//! its matcher, in order. The queue belongs to the [`SetupScope`] value, which
//! is consumed by [`SetupScope::compile`], so matchers cannot leak into an
//! unrelated statement.

use crate::call::{CallRecord, GenericArg, Slot};
use crate::error::SetupError;
use crate::types::TypeHandle;
use crate::value::{DynValue, Value};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Predicate usable in place of a literal in a call pattern.
#[derive(Clone)]
pub struct Matcher {
    description: String,
    predicate: Predicate,
    accepts_null: bool,
}

impl Matcher {
    /// Matcher described as `description`.
    pub fn new<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            predicate: Arc::new(predicate),
            accepts_null: false,
        }
    }

    /// Also match [`Value::Null`] without consulting the predicate.
    pub fn accepting_null(mut self) -> Self {
        self.accepts_null = true;
        self
    }

    /// Human-readable description, used in diagnostics.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether `value` satisfies the matcher.
    pub fn matches(&self, value: &Value) -> bool {
        let value = value.resolved();
        if self.accepts_null && value.is_null() {
            return true;
        }
        (self.predicate)(&value)
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("description", &self.description)
            .field("accepts_null", &self.accepts_null)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// Matcher factories.
#[derive(Debug, Clone, Copy)]
pub struct Arg;

impl Arg {
    /// Any `T`, or null.
    pub fn any<T: Any>() -> Matcher {
        Matcher::new(format!("any<{}>", std::any::type_name::<T>()), Value::is::<T>)
            .accepting_null()
    }

    /// A `T` satisfying `predicate`. Null never matches.
    pub fn is<T: Any>(predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Matcher {
        Matcher::new(format!("is<{}>", std::any::type_name::<T>()), move |value| {
            value.downcast_ref::<T>().is_some_and(&predicate)
        })
    }

    /// A value equal to `expected`, described like a literal.
    pub fn eq<T: DynValue>(expected: T) -> Matcher {
        let expected = Value::of(expected);
        Matcher::new(format!("{expected}"), move |value| *value == expected)
    }

    /// Untyped predicate over the raw value.
    pub fn custom(
        description: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Matcher {
        Matcher::new(description, predicate)
    }
}

/// Types that can stand in for an argument while a setup statement runs.
///
/// Placeholders are derived from a per-statement seed so consecutive matchers
/// of the same type get distinct values. They should be unlikely literals:
/// a literal argument equal to a queued placeholder makes the statement
/// ambiguous and fails compilation.
pub trait Placeholder: DynValue + Clone {
    /// Placeholder for the `seed`-th matcher of a statement.
    fn placeholder(seed: u64) -> Self;
}

macro_rules! int_placeholder {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Placeholder for $ty {
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                fn placeholder(seed: u64) -> Self {
                    <$ty>::MAX.wrapping_sub(seed as $ty)
                }
            }
        )*
    };
}

int_placeholder!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Placeholder for f64 {
    fn placeholder(seed: u64) -> Self {
        Self::from_bits(0x7FEF_FFFF_FFFF_FFFF - (seed & 0xFFFF_FFFF))
    }
}

impl Placeholder for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn placeholder(seed: u64) -> Self {
        Self::from_bits(0x7F7F_FFFF - (seed & 0xFFFF) as u32)
    }
}

impl Placeholder for bool {
    fn placeholder(seed: u64) -> Self {
        seed % 2 == 1
    }
}

impl Placeholder for char {
    #[allow(clippy::cast_possible_truncation)]
    fn placeholder(seed: u64) -> Self {
        // Plane 16 private use area.
        Self::from_u32(0x10_FFFD - (seed % 0xFFFE) as u32).unwrap_or(Self::REPLACEMENT_CHARACTER)
    }
}

impl Placeholder for String {
    fn placeholder(seed: u64) -> Self {
        format!("\u{1}placeholder#{seed}")
    }
}

impl Placeholder for () {
    fn placeholder(_seed: u64) -> Self {}
}

impl<T: Placeholder + PartialEq> Placeholder for Option<T> {
    fn placeholder(seed: u64) -> Self {
        Some(T::placeholder(seed))
    }
}

impl<T: Placeholder + PartialEq> Placeholder for Vec<T> {
    fn placeholder(seed: u64) -> Self {
        vec![T::placeholder(seed)]
    }
}

/// Matcher queue for one setup or verify statement.
#[derive(Debug, Default)]
pub struct SetupScope {
    queue: RefCell<VecDeque<(Matcher, Value)>>,
    seed: Cell<u64>,
}

impl SetupScope {
    /// Empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Placeholder for a matcher accepting any `T` (or null).
    pub fn any<T: Placeholder>(&self) -> T {
        self.matching(Arg::any::<T>())
    }

    /// Placeholder for a matcher accepting a `T` that satisfies `predicate`.
    pub fn is<T: Placeholder>(&self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> T {
        self.matching(Arg::is::<T>(predicate))
    }

    /// Placeholder for an arbitrary matcher.
    pub fn matching<T: Placeholder>(&self, matcher: Matcher) -> T {
        let seed = self.seed.get();
        self.seed.set(seed.wrapping_add(1));
        let placeholder = T::placeholder(seed);
        self.queue
            .borrow_mut()
            .push_back((matcher, Value::of(placeholder.clone())));
        placeholder
    }

    /// Generic type argument that compiles to a wildcard.
    pub fn any_type(&self) -> TypeHandle {
        TypeHandle::wildcard()
    }

    /// Matchers queued and not yet compiled.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Turn a recorded call into a pattern.
    ///
    /// Placeholder arguments are replaced by their matchers in queue order and
    /// wildcard generic arguments become [`GenericArg::Any`].
    ///
    /// # Errors
    /// [`SetupError::AmbiguousPlaceholder`] when more arguments equal a queued
    /// placeholder than matchers were queued, and
    /// [`SetupError::UnusedMatchers`] when queued matchers do not line up with
    /// the recorded arguments.
    pub fn compile(self, mut record: CallRecord) -> Result<CallRecord, SetupError> {
        let mut queue = self.queue.into_inner();
        let lookalikes = record
            .args()
            .iter()
            .filter(|slot| match slot {
                Slot::Value(value) => queue.iter().any(|(_, placeholder)| placeholder == value),
                Slot::Matcher(_) => false,
            })
            .count();
        if lookalikes > queue.len() {
            return Err(SetupError::AmbiguousPlaceholder {
                matchers: queue.len(),
                arguments: lookalikes,
            });
        }
        for slot in record.args_mut().iter_mut() {
            let Slot::Value(value) = slot else {
                continue;
            };
            let is_placeholder = queue
                .front()
                .is_some_and(|(_, placeholder)| *placeholder == *value);
            if !is_placeholder {
                continue;
            }
            if let Some((matcher, _)) = queue.pop_front() {
                *slot = Slot::Matcher(matcher);
            }
        }
        for generic in record.generics_mut().iter_mut() {
            if matches!(generic, GenericArg::Type(ty) if ty.is_wildcard()) {
                *generic = GenericArg::Any;
            }
        }
        if queue.is_empty() {
            Ok(record)
        } else {
            Err(SetupError::UnusedMatchers(queue.len()))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn matchers_describe_themselves() {
        assert_eq!(Arg::any::<i32>().to_string(), "any<i32>");
        assert_eq!(Arg::is::<u8>(|v| *v > 1).to_string(), "is<u8>");
        assert_eq!(Arg::eq(String::from("x")).to_string(), "\"x\"");
    }

    #[test]
    fn predicate_matcher_is_typed() {
        let gt8 = Arg::is::<i32>(|v| *v > 8);
        assert!(gt8.matches(&Value::of(9_i32)));
        assert!(!gt8.matches(&Value::of(2_i32)));
        assert!(!gt8.matches(&Value::of(9_i64)));
        assert!(!gt8.matches(&Value::Null));
    }

    #[test]
    fn placeholders_differ_per_seed() {
        assert_ne!(i32::placeholder(0), i32::placeholder(1));
        assert_ne!(String::placeholder(0), String::placeholder(1));
        assert_ne!(f64::placeholder(0), f64::placeholder(1));
        assert_ne!(char::placeholder(0), char::placeholder(1));
    }

    #[test]
    fn compile_replaces_placeholders_in_order() {
        let scope = SetupScope::new();
        let a: i32 = scope.any();
        let b: i32 = scope.is(|v| *v < 0);
        let recorded = CallRecord::observed(
            "add",
            &[scope.any_type()],
            &[Value::of(a), Value::of(5_i32), Value::of(b)],
        );
        let pattern = scope.compile(recorded).expect("compiles");
        assert_eq!(pattern.to_string(), "add<?>(any<i32>, 5, is<i32>)");
    }

    #[test]
    fn leftover_matchers_are_reported() {
        let scope = SetupScope::new();
        let _: i32 = scope.any();
        let _: String = scope.any();
        let recorded = CallRecord::observed("noop", &[], &[]);
        assert_eq!(scope.compile(recorded).unwrap_err(), SetupError::UnusedMatchers(2));
    }

    #[test]
    fn literal_equal_to_a_placeholder_is_ambiguous() {
        let scope = SetupScope::new();
        let flag: bool = scope.any();
        let recorded = CallRecord::observed("pick", &[], &[Value::of(false), Value::of(flag)]);
        assert_eq!(
            scope.compile(recorded).unwrap_err(),
            SetupError::AmbiguousPlaceholder {
                matchers: 1,
                arguments: 2
            }
        );
    }

    #[test]
    fn distinct_bool_placeholders_compile_positionally() {
        let scope = SetupScope::new();
        let a: bool = scope.any();
        let b: bool = scope.any();
        let recorded = CallRecord::observed("pick", &[], &[Value::of(a), Value::of(b)]);
        let pattern = scope.compile(recorded).expect("compiles");
        assert_eq!(pattern.to_string(), "pick(any<bool>, any<bool>)");
    }

    #[test]
    fn literal_other_than_the_placeholder_stays_literal() {
        let scope = SetupScope::new();
        let flag: bool = scope.any();
        let recorded = CallRecord::observed("pick", &[], &[Value::of(true), Value::of(flag)]);
        let pattern = scope.compile(recorded).expect("compiles");
        assert_eq!(pattern.to_string(), "pick(true, any<bool>)");
    }

    #[test]
    fn optional_and_vector_placeholders_wrap_the_inner_sentinel() {
        assert_eq!(Option::<i32>::placeholder(0), Some(i32::MAX));
        assert_eq!(Vec::<u8>::placeholder(1), vec![u8::MAX - 1]);
    }
}
