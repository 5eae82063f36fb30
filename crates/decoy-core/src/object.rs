// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fake instances and the override forwarding machinery.

use crate::carrier::RefCarrier;
use crate::dispatcher::Dispatcher;
use crate::error::Fault;
use crate::settings::FakeSettings;
use crate::synth::SynthesizedType;
use crate::types::{MemberDescriptor, ParamMode, TypeHandle};
use crate::value::{DynValue, Value};
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Caller-side argument of an override invocation.
#[derive(Debug)]
pub enum Argument<'a> {
    /// By-value argument.
    Value(Value),
    /// By-reference argument: copied in, then copied back after the call.
    Ref(&'a mut Value),
    /// Output-only argument: copied back after the call.
    Out(&'a mut Value),
}

impl Argument<'_> {
    /// Box a by-value argument.
    pub fn of<T: DynValue>(value: T) -> Self {
        Self::Value(Value::of(value))
    }

    /// Passing mode.
    pub fn mode(&self) -> ParamMode {
        match self {
            Self::Value(_) => ParamMode::Value,
            Self::Ref(_) => ParamMode::Ref,
            Self::Out(_) => ParamMode::Out,
        }
    }

    fn payload_type_id(&self) -> Option<TypeId> {
        match self {
            Self::Value(value) => value.payload_type_id(),
            Self::Ref(value) => value.payload_type_id(),
            Self::Out(_) => None,
        }
    }

    fn boxed(&self) -> Value {
        match self {
            Self::Value(value) => value.resolved(),
            Self::Ref(value) => Value::Ref(RefCarrier::new(value.resolved())),
            Self::Out(_) => Value::Ref(RefCarrier::empty()),
        }
    }
}

/// Positional arguments handed to behavior and base bodies.
///
/// By-reference parameters appear as [`Value::Ref`] carriers; writing to the
/// carrier updates the caller's storage once the call returns successfully.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: Vec<Value>,
}

impl Arguments {
    /// Wrap `values`.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Arguments in order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Iterate in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Raw argument at `index`.
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Argument at `index` as `T`. Carriers are looked through.
    ///
    /// # Errors
    /// [`Fault::ArgumentType`] when the argument is missing, null or not a `T`.
    pub fn get<T: Any + Clone>(&self, index: usize) -> Result<T, Fault> {
        let value = self.values.get(index);
        value
            .and_then(Value::get::<T>)
            .ok_or_else(|| Fault::ArgumentType {
                index,
                expected: std::any::type_name::<T>(),
                actual: value.map_or_else(
                    || String::from("missing"),
                    |value| value.payload_type_name().unwrap_or("'null'").to_owned(),
                ),
            })
    }

    /// Carrier of the by-reference argument at `index`.
    ///
    /// # Errors
    /// [`Fault::ArgumentType`] when the argument is not passed by reference.
    pub fn carrier(&self, index: usize) -> Result<&RefCarrier, Fault> {
        let value = self.values.get(index);
        value
            .and_then(Value::as_carrier)
            .ok_or_else(|| Fault::ArgumentType {
                index,
                expected: "RefCarrier",
                actual: value
                    .and_then(Value::payload_type_name)
                    .unwrap_or("'null'")
                    .to_owned(),
            })
    }

    /// Write `value` into the by-reference argument at `index`.
    ///
    /// # Errors
    /// See [`Arguments::carrier`].
    pub fn set<T: DynValue>(&self, index: usize, value: T) -> Result<(), Fault> {
        self.carrier(index)?.put(value);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Instance of a synthesized type, bound to exactly one [`Dispatcher`].
///
/// Equality and hashing go through the dispatcher identifier. The dispatcher
/// is not thread-safe, so `FakeObject` is `!Sync`.
pub struct FakeObject {
    ty: Arc<SynthesizedType>,
    dispatcher: Dispatcher,
    settings: FakeSettings,
}

impl FakeObject {
    pub(crate) fn new(ty: Arc<SynthesizedType>, settings: FakeSettings) -> Self {
        Self {
            ty,
            dispatcher: Dispatcher::new(&settings),
            settings,
        }
    }

    /// The synthesized type.
    pub fn synthesized_type(&self) -> &Arc<SynthesizedType> {
        &self.ty
    }

    /// The owning dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Settings the instance was created with.
    pub fn settings(&self) -> FakeSettings {
        self.settings
    }

    /// Invoke the override fitting `name`, `generics` and the argument
    /// shapes.
    ///
    /// By-value arguments are boxed and by-reference ones travel in fresh
    /// carriers. The result is cast to the declared return type and carriers
    /// are copied back to `args` when the call succeeds.
    ///
    /// # Errors
    /// [`Fault::MissingMember`] when no override fits, otherwise whatever the
    /// dispatcher or the cast reports.
    pub fn invoke(
        &self,
        name: &str,
        generics: &[TypeHandle],
        args: &mut [Argument<'_>],
    ) -> Result<Value, Fault> {
        let shapes: Vec<(ParamMode, Option<TypeId>)> = args
            .iter()
            .map(|arg| (arg.mode(), arg.payload_type_id()))
            .collect();
        let member = self
            .ty
            .resolve(name, generics.len(), &shapes)
            .map(|slot| Arc::clone(slot.member()))
            .ok_or_else(|| Fault::MissingMember {
                ty: self.ty.name().to_owned(),
                member: name.to_owned(),
            })?;

        let arguments = Arguments::new(args.iter().map(Argument::boxed).collect());
        let result = self.dispatcher.dispatch(self, &member, generics, &arguments)?;

        for (arg, boxed) in args.iter_mut().zip(arguments.iter()) {
            if let (Argument::Ref(target) | Argument::Out(target), Some(carrier)) =
                (arg, boxed.as_carrier())
            {
                **target = carrier.get();
            }
        }
        self.cast_return(&member, result)
    }

    /// Invoke a non-generic member with by-value arguments.
    ///
    /// # Errors
    /// See [`FakeObject::invoke`].
    pub fn call(&self, name: &str, args: Vec<Value>) -> Result<Value, Fault> {
        let mut args: Vec<Argument<'_>> = args.into_iter().map(Argument::Value).collect();
        self.invoke(name, &[], &mut args)
    }

    /// Read `property` through its getter override.
    ///
    /// # Errors
    /// See [`FakeObject::invoke`].
    pub fn get(&self, property: &str) -> Result<Value, Fault> {
        self.invoke(&format!("get_{property}"), &[], &mut [])
    }

    /// Write `property` through its setter override.
    ///
    /// # Errors
    /// See [`FakeObject::invoke`].
    pub fn set(&self, property: &str, value: Value) -> Result<(), Fault> {
        self.invoke(&format!("set_{property}"), &[], &mut [Argument::Value(value)])
            .map(drop)
    }

    fn cast_return(&self, member: &MemberDescriptor, value: Value) -> Result<Value, Fault> {
        let Some(returns) = member.returns() else {
            return Ok(Value::Null);
        };
        let value = value.resolved();
        if value.is_null() {
            return Ok(self.dispatcher.default_for(returns));
        }
        match (returns.rust_type(), value.payload_type_id()) {
            (Some(expected), Some(actual)) if expected != actual => Err(Fault::ReturnTypeMismatch {
                member: member.signature(),
                expected: returns.name().to_owned(),
                actual: value.payload_type_name().unwrap_or("'null'").to_owned(),
            }),
            _ => Ok(value),
        }
    }
}

impl PartialEq for FakeObject {
    fn eq(&self, other: &Self) -> bool {
        self.dispatcher.id() == other.dispatcher.id()
    }
}

impl Eq for FakeObject {}

impl Hash for FakeObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dispatcher.id().hash(state);
    }
}

impl fmt::Debug for FakeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeObject")
            .field("type", &self.ty.name())
            .field("dispatcher", &self.dispatcher.id())
            .field("mode", &self.dispatcher.mode())
            .finish_non_exhaustive()
    }
}

impl Drop for FakeObject {
    #[allow(clippy::panic)]
    fn drop(&mut self) {
        if !self.settings.verify_on_drop || std::thread::panicking() {
            return;
        }
        if let Err(fault) = self.dispatcher.verify_all(None) {
            panic!("{fault}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::behavior::Behavior;
    use crate::call::CallRecord;
    use crate::settings::FakeMode;
    use crate::synth::TypeCache;
    use crate::types::{Access, TypeBuilder};

    fn parser() -> TypeHandle {
        let int = TypeHandle::of_default::<i32>();
        let string = TypeHandle::of_default::<String>();
        let flag = TypeHandle::of_default::<bool>();
        TypeBuilder::interface("Parser")
            .member(
                MemberDescriptor::method("parse")
                    .param("input", &string, ParamMode::Value)
                    .param("result", &int, ParamMode::Out)
                    .returns(&flag)
                    .build(),
            )
            .member(
                MemberDescriptor::method("bump")
                    .param("counter", &int, ParamMode::Ref)
                    .build(),
            )
            .property("depth", &int, Access::ReadWrite)
            .build()
    }

    fn fake(settings: FakeSettings) -> FakeObject {
        TypeCache::new()
            .synthesize(None, &[parser()])
            .unwrap()
            .instantiate(settings)
    }

    #[test]
    fn out_parameters_are_copied_back() {
        let fake = fake(FakeSettings::strict());
        fake.dispatcher().setup(
            CallRecord::new("parse").arg(String::from("42")).value(Value::Null),
            Behavior::new(|args| {
                args.set(1, 42_i32)?;
                Ok(Value::of(true))
            }),
        );
        let mut result = Value::Null;
        let ok = fake
            .invoke(
                "parse",
                &[],
                &mut [Argument::of(String::from("42")), Argument::Out(&mut result)],
            )
            .unwrap();
        assert_eq!(ok, Value::of(true));
        assert_eq!(result, Value::of(42_i32));
    }

    #[test]
    fn ref_parameters_are_copied_in_and_out() {
        let fake = fake(FakeSettings::strict());
        fake.dispatcher().setup(
            CallRecord::new("bump").arg(1_i32),
            Behavior::new(|args| {
                let current: i32 = args.get(0)?;
                args.set(0, current + 1)?;
                Ok(Value::Null)
            }),
        );
        let mut counter = Value::of(1_i32);
        fake.invoke("bump", &[], &mut [Argument::Ref(&mut counter)]).unwrap();
        assert_eq!(counter, Value::of(2_i32));
    }

    #[test]
    fn failed_calls_leave_caller_storage_untouched() {
        let fake = fake(FakeSettings::strict());
        let mut counter = Value::of(1_i32);
        let fault = fake
            .invoke("bump", &[], &mut [Argument::Ref(&mut counter)])
            .unwrap_err();
        assert!(fault.is_unmatched());
        assert_eq!(counter, Value::of(1_i32));
    }

    #[test]
    fn lenient_fakes_return_declared_defaults() {
        let fake = fake(FakeSettings::lenient());
        assert_eq!(fake.get("depth").unwrap(), Value::of(0_i32));
        fake.set("depth", Value::of(3_i32)).unwrap();
        assert_eq!(fake.dispatcher().calls().len(), 2);
        assert_eq!(fake.dispatcher().mode(), FakeMode::Lenient);
    }

    #[test]
    fn unknown_members_are_reported() {
        let fake = fake(FakeSettings::lenient());
        let fault = fake.call("missing", vec![]).unwrap_err();
        assert!(matches!(fault, Fault::MissingMember { .. }));
        let wrong_type = fake.call("get_depth", vec![Value::of(1_i32)]).unwrap_err();
        assert!(matches!(wrong_type, Fault::MissingMember { .. }));
    }

    #[test]
    fn return_values_are_type_checked() {
        let fake = fake(FakeSettings::strict());
        fake.dispatcher()
            .setup(CallRecord::new("get_depth"), Behavior::returns(String::from("deep")));
        let fault = fake.get("depth").unwrap_err();
        assert!(matches!(fault, Fault::ReturnTypeMismatch { .. }));
    }

    #[test]
    fn instances_compare_by_dispatcher() {
        let ty = TypeCache::new().synthesize(None, &[parser()]).unwrap();
        let a = ty.instantiate(FakeSettings::strict());
        let b = ty.instantiate(FakeSettings::strict());
        assert_eq!(a, a);
        assert_ne!(a, b);
    }
}
