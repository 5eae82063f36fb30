// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Argument slots and result unwrapping for [`fake!`](crate::fake!) adapters.
//!
//! Each trait-method parameter is wrapped in a slot, the slots lend
//! [`Argument`]s to [`FakeObject::invoke`], and by-reference slots write the
//! carrier contents back into the caller's `&mut T` afterwards.

use crate::error::Fault;
use crate::object::{Argument, FakeObject};
use crate::value::{DynValue, Value};
use std::any::Any;

/// A parameter on its way into a fake.
pub trait Forward {
    /// Lend the argument for one invocation.
    fn argument(&mut self) -> Argument<'_>;
    /// Write the post-call value back to the caller.
    fn restore(self);
}

/// By-value parameter.
#[derive(Debug)]
pub struct ValueSlot(Value);

impl ValueSlot {
    /// Box `value`.
    pub fn new<T: DynValue>(value: T) -> Self {
        Self(Value::of(value))
    }
}

impl Forward for ValueSlot {
    fn argument(&mut self) -> Argument<'_> {
        Argument::Value(std::mem::take(&mut self.0))
    }

    fn restore(self) {}
}

/// By-reference parameter: copied in, copied back.
#[derive(Debug)]
pub struct RefSlot<'a, T> {
    target: &'a mut T,
    value: Value,
}

impl<'a, T: DynValue + Clone> RefSlot<'a, T> {
    /// Snapshot `target`.
    pub fn new(target: &'a mut T) -> Self {
        let value = Value::of(target.clone());
        Self { target, value }
    }
}

impl<T: DynValue + Clone> Forward for RefSlot<'_, T> {
    fn argument(&mut self) -> Argument<'_> {
        Argument::Ref(&mut self.value)
    }

    fn restore(self) {
        if let Some(value) = self.value.get::<T>() {
            *self.target = value;
        }
    }
}

/// Output-only parameter: the caller's value is not sent; a written value is
/// copied back.
#[derive(Debug)]
pub struct OutSlot<'a, T> {
    target: &'a mut T,
    value: Value,
}

impl<'a, T: DynValue + Clone> OutSlot<'a, T> {
    /// Slot writing into `target`.
    pub fn new(target: &'a mut T) -> Self {
        Self {
            target,
            value: Value::Null,
        }
    }
}

impl<T: DynValue + Clone> Forward for OutSlot<'_, T> {
    fn argument(&mut self) -> Argument<'_> {
        Argument::Out(&mut self.value)
    }

    fn restore(self) {
        if let Some(value) = self.value.get::<T>() {
            *self.target = value;
        }
    }
}

/// Unwrap a member result as `T`; null becomes `T::default()`.
///
/// # Panics
/// On a fault or a result of another type. Trait signatures cannot carry
/// engine errors, so they surface as test failures.
#[allow(clippy::panic)]
pub fn expect_value<T: Any + Clone + Default>(member: &str, result: Result<Value, Fault>) -> T {
    match result {
        Ok(value) if value.is_null() => T::default(),
        Ok(value) => value.get::<T>().unwrap_or_else(|| {
            panic!(
                "fake member {member} produced {value}, not a {}",
                std::any::type_name::<T>()
            )
        }),
        Err(fault) => panic!("{fault}"),
    }
}

/// Unwrap a void member result.
///
/// # Panics
/// On a fault.
#[allow(clippy::panic)]
pub fn expect_unit(result: Result<Value, Fault>) {
    if let Err(fault) = result {
        panic!("{fault}");
    }
}

/// Unwrap fake construction.
///
/// # Panics
/// When the fake cannot be synthesized.
#[allow(clippy::panic)]
pub fn expect_fake(result: Result<FakeObject, Fault>) -> FakeObject {
    match result {
        Ok(object) => object,
        Err(fault) => panic!("cannot create fake: {fault}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn ref_slot_writes_back_carrier_contents() {
        let mut target = 1_i32;
        let mut slot = RefSlot::new(&mut target);
        if let Argument::Ref(value) = slot.argument() {
            assert_eq!(*value, Value::of(1_i32));
            *value = Value::of(5_i32);
        }
        slot.restore();
        assert_eq!(target, 5);
    }

    #[test]
    fn out_slot_keeps_target_when_unset() {
        let mut target = String::from("kept");
        let mut slot = OutSlot::new(&mut target);
        assert!(matches!(slot.argument(), Argument::Out(value) if value.is_null()));
        slot.restore();
        assert_eq!(target, "kept");
    }

    #[test]
    fn null_results_become_defaults() {
        assert_eq!(expect_value::<i32>("m", Ok(Value::Null)), 0);
        assert_eq!(expect_value::<i32>("m", Ok(Value::of(4_i32))), 4);
    }

    #[test]
    #[should_panic(expected = "not a i32")]
    fn mistyped_results_panic() {
        let _ = expect_value::<i32>("m", Ok(Value::of(4_u8)));
    }
}
