// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Dynamically typed values that cross the dispatch boundary.

use crate::carrier::RefCarrier;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Object-safe view of a value stored inside a [`Value`].
///
/// Implemented for every `'static` type that is `Debug + PartialEq + Send +
/// Sync`. Types that cannot derive `PartialEq` may implement it by hand to
/// supply their own equality.
pub trait DynValue: Any + fmt::Debug + Send + Sync {
    /// Upcast for downcasting.
    fn as_any(&self) -> &dyn Any;
    /// Structural equality against another erased value.
    fn dyn_eq(&self, other: &dyn DynValue) -> bool;
    /// `TypeId` of the concrete value.
    fn value_type_id(&self) -> TypeId;
    /// Rust type name of the concrete value.
    fn value_type_name(&self) -> &'static str;
}

impl<T> DynValue for T
where
    T: Any + fmt::Debug + PartialEq + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn DynValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn value_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn value_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// A boxed argument or return value.
///
/// `Null` is "no value": the result of a void member, an unset out
/// parameter, or a reference-like default. `Ref` only appears in the argument
/// list handed to behavior bodies; call records store a snapshot instead.
#[derive(Clone, Default)]
pub enum Value {
    /// No value.
    #[default]
    Null,
    /// Shared, immutable payload.
    Data(Arc<dyn DynValue>),
    /// By-reference parameter carrier.
    Ref(RefCarrier),
}

impl Value {
    /// Box `value`.
    ///
    /// Passing a `Value` here nests it; use the value directly instead.
    pub fn of<T: DynValue>(value: T) -> Self {
        Self::Data(Arc::new(value))
    }

    /// Whether this is [`Value::Null`] (carriers are looked through).
    pub fn is_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Data(_) => false,
            Self::Ref(carrier) => carrier.get().is_null(),
        }
    }

    /// Current value with carriers resolved to their contents.
    pub fn resolved(&self) -> Value {
        match self {
            Self::Ref(carrier) => carrier.get().resolved(),
            other => other.clone(),
        }
    }

    /// Clone the payload out as `T`, if it is one.
    pub fn get<T: Any + Clone>(&self) -> Option<T> {
        match self {
            Self::Null => None,
            Self::Data(data) => data.as_any().downcast_ref::<T>().cloned(),
            Self::Ref(carrier) => carrier.get().get::<T>(),
        }
    }

    /// Borrow the payload as `T`. Carriers are not looked through.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Data(data) => data.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Whether the payload is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.payload_type_id() == Some(TypeId::of::<T>())
    }

    /// `TypeId` of the payload, `None` for null.
    pub fn payload_type_id(&self) -> Option<TypeId> {
        match self.resolved() {
            Self::Data(data) => Some(data.value_type_id()),
            _ => None,
        }
    }

    /// Rust type name of the payload, `None` for null.
    pub fn payload_type_name(&self) -> Option<&'static str> {
        match self.resolved() {
            Self::Data(data) => Some(data.value_type_name()),
            _ => None,
        }
    }

    /// The carrier, when this is a by-reference slot.
    pub fn as_carrier(&self) -> Option<&RefCarrier> {
        match self {
            Self::Ref(carrier) => Some(carrier),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self.resolved(), other.resolved()) {
            (Self::Null, Self::Null) => true,
            (Self::Data(a), Self::Data(b)) => a.dyn_eq(&*b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("'null'"),
            Self::Data(data) => fmt::Debug::fmt(&**data, f),
            Self::Ref(carrier) => fmt::Debug::fmt(&carrier.get(), f),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Value-comparison collaborator used when a pattern slot holds a literal.
pub trait ValueComparer: Send + Sync {
    /// Whether `actual` satisfies the literal `expected`.
    fn equals(&self, expected: &Value, actual: &Value) -> bool;
}

/// Default comparer: structural equality through [`DynValue::dyn_eq`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralComparer;

impl ValueComparer for StructuralComparer {
    fn equals(&self, expected: &Value, actual: &Value) -> bool {
        expected == actual
    }
}
