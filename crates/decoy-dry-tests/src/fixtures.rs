// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Canonical type descriptors.
//!
//! Each fixture is built once and cached, so repeated calls return the same
//! [`TypeHandle`] and therefore hit the same synthesis cache entry.
//!
//! # Example
//!
//! ```
//! use decoy_dry_tests::fixtures::{calculator, named};
//! use decoy_core::synthesize;
//! use std::sync::Arc;
//!
//! let a = synthesize(None, &[calculator(), named()]).unwrap();
//! let b = synthesize(None, &[named(), calculator()]).unwrap();
//! assert!(Arc::ptr_eq(&a, &b));
//! ```

use decoy_core::{
    Access, Dispatch, FakeObject, FakeSettings, MemberDescriptor, ParamMode, TypeBuilder,
    TypeHandle, Value, Visibility,
};
use std::sync::OnceLock;

/// Interface `Calculator`:
///
/// - `calc(x: i32) -> i32`
/// - `label(out s: String)`
/// - `accumulate(ref total: i64, amount: i64)`
/// - `reset()`
/// - `convert<T>(value: i32) -> String`
/// - property `precision: u32` (read/write)
pub fn calculator() -> TypeHandle {
    static TYPE: OnceLock<TypeHandle> = OnceLock::new();
    TYPE.get_or_init(|| {
        let int = TypeHandle::of_default::<i32>();
        let long = TypeHandle::of_default::<i64>();
        let string = TypeHandle::of_default::<String>();
        let precision = TypeHandle::of_default::<u32>();
        TypeBuilder::interface("Calculator")
            .member(
                MemberDescriptor::method("calc")
                    .param("x", &int, ParamMode::Value)
                    .returns(&int)
                    .build(),
            )
            .member(
                MemberDescriptor::method("label")
                    .param("s", &string, ParamMode::Out)
                    .build(),
            )
            .member(
                MemberDescriptor::method("accumulate")
                    .param("total", &long, ParamMode::Ref)
                    .param("amount", &long, ParamMode::Value)
                    .build(),
            )
            .member(MemberDescriptor::method("reset").build())
            .member(
                MemberDescriptor::method("convert")
                    .generic_arity(1)
                    .param("value", &int, ParamMode::Value)
                    .returns(&string)
                    .build(),
            )
            .property("precision", &precision, Access::ReadWrite)
            .build()
    })
    .clone()
}

/// Interface `Named` with a read-only `name: String` property.
pub fn named() -> TypeHandle {
    static TYPE: OnceLock<TypeHandle> = OnceLock::new();
    TYPE.get_or_init(|| {
        TypeBuilder::interface("Named")
            .property("name", &TypeHandle::of_default::<String>(), Access::Read)
            .build()
    })
    .clone()
}

/// Interface `Scientific`, extending [`calculator`] with `sqrt(x: f64) -> f64`.
pub fn scientific() -> TypeHandle {
    static TYPE: OnceLock<TypeHandle> = OnceLock::new();
    TYPE.get_or_init(|| {
        let float = TypeHandle::of_default::<f64>();
        TypeBuilder::interface("Scientific")
            .implements(&calculator())
            .member(
                MemberDescriptor::method("sqrt")
                    .param("x", &float, ParamMode::Value)
                    .returns(&float)
                    .build(),
            )
            .build()
    })
    .clone()
}

/// Class `Shape` with one member of every dispatch flavor:
///
/// - `area() -> f64`: virtual, base returns `1.5`
/// - `sides() -> u32`: abstract
/// - `describe() -> String`: virtual, base calls `sides()` on the receiver
/// - `id() -> u64`: final
/// - `layout()`: non-virtual
/// - `scale(factor: f64)`: internal, visible to fakes
/// - `secret()`: internal, hidden from fakes
/// - `dispose()`: finalizer
pub fn shape() -> TypeHandle {
    static TYPE: OnceLock<TypeHandle> = OnceLock::new();
    TYPE.get_or_init(|| {
        let float = TypeHandle::of_default::<f64>();
        let count = TypeHandle::of_default::<u32>();
        let id = TypeHandle::of_default::<u64>();
        let string = TypeHandle::of_default::<String>();
        TypeBuilder::class("Shape")
            .member(
                MemberDescriptor::method("area")
                    .returns(&float)
                    .body(|_, _| Ok(Value::of(1.5_f64)))
                    .build(),
            )
            .member(MemberDescriptor::method("sides").returns(&count).build())
            .member(
                MemberDescriptor::method("describe")
                    .returns(&string)
                    .body(|this, _| {
                        let sides = this.call("sides", Vec::new())?;
                        Ok(Value::of(format!("shape with {sides} sides")))
                    })
                    .build(),
            )
            .member(
                MemberDescriptor::method("id")
                    .returns(&id)
                    .body(|_, _| Ok(Value::of(7_u64)))
                    .dispatch(Dispatch::Final)
                    .build(),
            )
            .member(
                MemberDescriptor::method("layout")
                    .body(|_, _| Ok(Value::Null))
                    .dispatch(Dispatch::NonVirtual)
                    .build(),
            )
            .member(
                MemberDescriptor::method("scale")
                    .param("factor", &float, ParamMode::Value)
                    .visibility(Visibility::Internal {
                        visible_to_fakes: true,
                    })
                    .body(|_, _| Ok(Value::Null))
                    .build(),
            )
            .member(
                MemberDescriptor::method("secret")
                    .visibility(Visibility::Internal {
                        visible_to_fakes: false,
                    })
                    .body(|_, _| Ok(Value::Null))
                    .build(),
            )
            .member(
                MemberDescriptor::method("dispose")
                    .finalizer()
                    .body(|_, _| Ok(Value::Null))
                    .build(),
            )
            .build()
    })
    .clone()
}

/// Class `Square`, deriving from [`shape`] and sealing `sides() -> u32` at 4.
pub fn square() -> TypeHandle {
    static TYPE: OnceLock<TypeHandle> = OnceLock::new();
    TYPE.get_or_init(|| {
        TypeBuilder::class("Square")
            .parent(&shape())
            .member(
                MemberDescriptor::method("sides")
                    .returns(&TypeHandle::of_default::<u32>())
                    .body(|_, _| Ok(Value::of(4_u32)))
                    .dispatch(Dispatch::Final)
                    .build(),
            )
            .build()
    })
    .clone()
}

/// Sealed class `Final`.
pub fn sealed_class() -> TypeHandle {
    TypeBuilder::class("Final").sealed().build()
}

/// Pointer type `*Widget`.
pub fn pointer_type() -> TypeHandle {
    TypeBuilder::pointer("*Widget").build()
}

/// Open generic class `Repository<T>`.
pub fn open_generic_class() -> TypeHandle {
    TypeBuilder::class("Repository<T>").open_generic().build()
}

/// Internal class `Hidden` without a grant to fakes.
pub fn hidden_class() -> TypeHandle {
    TypeBuilder::class("Hidden")
        .visibility(Visibility::Internal {
            visible_to_fakes: false,
        })
        .build()
}

/// Strict fake implementing [`calculator`].
///
/// # Panics
/// Never for the canonical fixture; synthesis of a valid interface cannot
/// fail.
#[allow(clippy::expect_used)]
pub fn strict_calculator() -> FakeObject {
    decoy_core::synthesize(None, &[calculator()])
        .expect("calculator fixture synthesizes")
        .instantiate(FakeSettings::strict())
}

/// Lenient fake implementing [`calculator`].
///
/// # Panics
/// Never for the canonical fixture.
#[allow(clippy::expect_used)]
pub fn lenient_calculator() -> FakeObject {
    decoy_core::synthesize(None, &[calculator()])
        .expect("calculator fixture synthesizes")
        .instantiate(FakeSettings::lenient())
}
