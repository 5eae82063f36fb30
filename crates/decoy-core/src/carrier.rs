// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Ref/Out carrier for by-reference parameters.

use crate::value::{DynValue, Value};
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Single-field mutable box that carries a by-reference argument across the
/// dispatch boundary.
///
/// A fresh carrier is created per call for every `ref`/`out` parameter. The
/// caller's value is copied in first (unless the parameter is output-only)
/// and whatever the carrier holds after the call is copied back into the
/// caller's storage. Clones share the same slot.
#[derive(Clone, Default)]
pub struct RefCarrier {
    slot: Arc<Mutex<Value>>,
}

impl RefCarrier {
    /// Carrier holding `value`.
    pub fn new(value: Value) -> Self {
        Self {
            slot: Arc::new(Mutex::new(value.resolved())),
        }
    }

    /// Carrier holding [`Value::Null`], used for output-only parameters.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshot of the current contents.
    pub fn get(&self) -> Value {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current contents as `T`, if they are one.
    pub fn get_as<T: Any + Clone>(&self) -> Option<T> {
        self.get().get::<T>()
    }

    /// Replace the contents.
    ///
    /// Carriers never nest: setting a `Value::Ref` stores its resolved
    /// contents.
    pub fn set(&self, value: Value) {
        let value = value.resolved();
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = value;
    }

    /// Box `value` and store it.
    pub fn put<T: DynValue>(&self, value: T) {
        self.set(Value::of(value));
    }

    /// Take the contents, leaving [`Value::Null`].
    pub fn take(&self) -> Value {
        std::mem::take(&mut *self.slot.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl fmt::Debug for RefCarrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefCarrier").field(&self.get()).finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_slot() {
        let carrier = RefCarrier::new(Value::of(1_i32));
        let alias = carrier.clone();
        alias.put(2_i32);
        assert_eq!(carrier.get_as::<i32>(), Some(2));
    }

    #[test]
    fn empty_carrier_holds_null() {
        let carrier = RefCarrier::empty();
        assert!(carrier.get().is_null());
        carrier.put(String::from("X"));
        assert_eq!(carrier.take().get::<String>().as_deref(), Some("X"));
        assert!(carrier.get().is_null());
    }

    #[test]
    fn nested_carriers_are_flattened() {
        let inner = RefCarrier::new(Value::of(9_u64));
        let outer = RefCarrier::new(Value::Ref(inner.clone()));
        inner.put(10_u64);
        assert_eq!(outer.get_as::<u64>(), Some(9));
        assert!(outer.get().as_carrier().is_none());
    }
}
