// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Configured responses bound to call patterns.

use crate::error::Fault;
use crate::object::Arguments;
use crate::times::Times;
use crate::types::TypeHandle;
use crate::value::{DynValue, Value};
use std::error::Error;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Behavior body. Receives the call's arguments; by-reference parameters
/// appear as carriers and may be written through [`Arguments::carrier`].
pub type Body = Arc<dyn Fn(&Arguments) -> Result<Value, Fault> + Send + Sync>;

/// Callable body, allowed call-count range, observed-call counter and an
/// optional "call the base member of this type instead" request.
///
/// Cloning shares the body and copies the counter by value.
pub struct Behavior {
    body: Body,
    times: Times,
    calls: AtomicUsize,
    base: Option<TypeHandle>,
}

impl Behavior {
    /// Behavior running `body` with the call's arguments.
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&Arguments) -> Result<Value, Fault> + Send + Sync + 'static,
    {
        Self {
            body: Arc::new(body),
            times: Times::default(),
            calls: AtomicUsize::new(0),
            base: None,
        }
    }

    /// Behavior running a body that ignores the arguments.
    pub fn from_fn<F>(body: F) -> Self
    where
        F: Fn() -> Result<Value, Fault> + Send + Sync + 'static,
    {
        Self::new(move |_| body())
    }

    /// Do nothing and return null.
    pub fn none() -> Self {
        Self::new(|_| Ok(Value::Null))
    }

    /// Always fail with `fault`.
    pub fn error(fault: Fault) -> Self {
        Self::new(move |_| Err(fault.clone()))
    }

    /// Always fail with a fresh `E::default()`.
    pub fn throw<E>() -> Self
    where
        E: Error + Default + Send + Sync + 'static,
    {
        Self::new(|_| Err(Fault::raise(E::default())))
    }

    /// Always return `value`.
    pub fn returns<T: DynValue>(value: T) -> Self {
        Self::returns_value(Value::of(value))
    }

    /// Always return an already boxed value.
    pub fn returns_value(value: Value) -> Self {
        Self::new(move |_| Ok(value.clone()))
    }

    /// Return `values` in order, then null (cast to the return type's
    /// default) forever.
    pub fn series<T, I>(values: I) -> Self
    where
        T: DynValue,
        I: IntoIterator<Item = T>,
    {
        Self::series_values(values.into_iter().map(Value::of).collect())
    }

    /// [`Behavior::series`] over boxed values.
    pub fn series_values(values: Vec<Value>) -> Self {
        let next = AtomicUsize::new(0);
        Self::new(move |_| {
            let index = next
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |i| i.checked_add(1))
                .unwrap_or(usize::MAX);
            Ok(values.get(index).cloned().unwrap_or_default())
        })
    }

    /// Run the implementation `ty` (or its nearest ancestor) declares for the
    /// called member.
    pub fn base(ty: &TypeHandle) -> Self {
        Self {
            base: Some(ty.clone()),
            ..Self::none()
        }
    }

    /// Replace the allowed call-count range.
    pub fn with_times(mut self, times: Times) -> Self {
        self.times = times;
        self
    }

    /// Count one call, then run the body.
    ///
    /// # Errors
    /// Whatever the body returns, unchanged.
    pub fn invoke(&self, args: &Arguments) -> Result<Value, Fault> {
        self.record_call();
        (self.body)(args)
    }

    pub(crate) fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Allowed call-count range.
    pub fn times(&self) -> Times {
        self.times
    }

    /// Whether the observed count is inside the allowed range.
    pub fn has_expected_calls(&self) -> bool {
        self.times.is_in_range(self.calls())
    }

    /// Type whose base implementation is requested, if any.
    pub fn base_type(&self) -> Option<&TypeHandle> {
        self.base.as_ref()
    }
}

impl Default for Behavior {
    fn default() -> Self {
        Self::none()
    }
}

impl Clone for Behavior {
    fn clone(&self) -> Self {
        Self {
            body: Arc::clone(&self.body),
            times: self.times,
            calls: AtomicUsize::new(self.calls()),
            base: self.base.clone(),
        }
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior")
            .field("times", &self.times)
            .field("calls", &self.calls())
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

/// [`Behavior`] whose body produces a `T`.
pub struct TypedBehavior<T> {
    inner: Behavior,
    returns: PhantomData<fn() -> T>,
}

impl<T: DynValue> TypedBehavior<T> {
    fn wrap(inner: Behavior) -> Self {
        Self {
            inner,
            returns: PhantomData,
        }
    }

    /// Behavior running `body` with the call's arguments.
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&Arguments) -> Result<T, Fault> + Send + Sync + 'static,
    {
        Self::wrap(Behavior::new(move |args| body(args).map(Value::of)))
    }

    /// Behavior running a body that ignores the arguments.
    pub fn from_fn<F>(body: F) -> Self
    where
        F: Fn() -> Result<T, Fault> + Send + Sync + 'static,
    {
        Self::wrap(Behavior::new(move |_| body().map(Value::of)))
    }

    /// Always return `value`.
    pub fn returns(value: T) -> Self {
        Self::wrap(Behavior::returns(value))
    }

    /// Return `values` in order, then the return type's default.
    pub fn series(values: impl IntoIterator<Item = T>) -> Self {
        Self::wrap(Behavior::series(values))
    }

    /// Replace the allowed call-count range.
    pub fn with_times(self, times: Times) -> Self {
        Self::wrap(self.inner.with_times(times))
    }

    /// Untyped view.
    pub fn as_behavior(&self) -> &Behavior {
        &self.inner
    }
}

impl<T> Clone for TypedBehavior<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            returns: PhantomData,
        }
    }
}

impl<T> fmt::Debug for TypedBehavior<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedBehavior")
            .field(&std::any::type_name::<T>())
            .field(&self.inner)
            .finish()
    }
}

impl<T> From<TypedBehavior<T>> for Behavior {
    fn from(typed: TypedBehavior<T>) -> Self {
        typed.inner
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[derive(Debug, Default, thiserror::Error)]
    #[error("disk on fire")]
    struct DiskOnFire;

    fn no_args() -> Arguments {
        Arguments::new(Vec::new())
    }

    #[test]
    fn invoke_counts_before_running() {
        let behavior = Behavior::throw::<DiskOnFire>().with_times(Times::once());
        let fault = behavior.invoke(&no_args()).unwrap_err();
        assert!(fault.downcast_raised::<DiskOnFire>().is_some());
        assert_eq!(behavior.calls(), 1);
        assert!(behavior.has_expected_calls());
    }

    #[test]
    fn series_then_null() {
        let behavior = Behavior::series([1_i32, 2]);
        let args = no_args();
        assert_eq!(behavior.invoke(&args).unwrap(), Value::of(1_i32));
        assert_eq!(behavior.invoke(&args).unwrap(), Value::of(2_i32));
        assert!(behavior.invoke(&args).unwrap().is_null());
        assert!(behavior.invoke(&args).unwrap().is_null());
    }

    #[test]
    fn clone_copies_the_counter() {
        let behavior = Behavior::returns(5_u8);
        behavior.invoke(&no_args()).unwrap();
        let copy = behavior.clone();
        behavior.invoke(&no_args()).unwrap();
        assert_eq!(copy.calls(), 1);
        assert_eq!(behavior.calls(), 2);
        assert_eq!(copy.invoke(&no_args()).unwrap(), Value::of(5_u8));
    }

    #[test]
    fn default_times_accept_any_count() {
        let behavior = Behavior::none();
        assert!(behavior.has_expected_calls());
        for _ in 0..3 {
            behavior.invoke(&no_args()).unwrap();
        }
        assert!(behavior.has_expected_calls());
    }

    #[test]
    fn typed_behavior_narrows_the_return() {
        let typed = TypedBehavior::new(|args: &Arguments| Ok(args.get::<i32>(0)? * 2));
        let behavior: Behavior = typed.with_times(Times::at_most(1)).into();
        let args = Arguments::new(vec![Value::of(21_i32)]);
        assert_eq!(behavior.invoke(&args).unwrap(), Value::of(42_i32));
        assert_eq!(behavior.times(), Times::at_most(1));
    }

    #[test]
    fn base_marks_the_target_type() {
        let ty = TypeHandle::object();
        assert_eq!(Behavior::base(&ty).base_type(), Some(&ty));
        assert!(Behavior::none().base_type().is_none());
    }
}
