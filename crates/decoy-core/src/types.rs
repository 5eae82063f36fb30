// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Runtime type model.
//!
//! Fakes are synthesized from descriptors rather than from compiled Rust
//! types. A [`TypeHandle`] is a shared, immutable [`TypeDescriptor`]; handle
//! identity is pointer identity, so the same descriptor must be reused wherever
//! the same type is meant. Native Rust types are interned in a process-wide
//! catalog by [`TypeHandle::of`], which keeps `of::<i32>()` stable across
//! calls.

use crate::error::Fault;
use crate::object::{Arguments, FakeObject};
use crate::value::{DynValue, Value};
use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Factory for a type's default value.
pub type DefaultFn = Arc<dyn Fn() -> Value + Send + Sync>;

/// Concrete implementation of a member, invoked for "call base" behaviors.
///
/// The first argument is the fake acting as the receiver, so a base body can
/// call other (overridden) members of the same instance.
pub type MemberBody = Arc<dyn Fn(&FakeObject, &Arguments) -> Result<Value, Fault> + Send + Sync>;

/// Broad category of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Inheritable reference type.
    Class,
    /// Pure capability contract.
    Interface,
    /// Value type; always sealed.
    ValueType,
    /// Raw pointer type; never fakeable.
    Pointer,
}

/// Accessibility of a type or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Visible everywhere.
    Public,
    /// Visible inside the declaring assembly; `visible_to_fakes` grants the
    /// synthesizer access.
    Internal {
        /// Whether the declaring assembly grants visibility to fakes.
        visible_to_fakes: bool,
    },
    /// Visible only to the declaring type.
    Private,
}

/// How a member participates in virtual dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dispatch {
    /// No implementation; must be overridden.
    Abstract,
    /// Implemented and overridable.
    Virtual,
    /// Implemented override that may not be overridden again.
    Final,
    /// Implemented, not part of virtual dispatch.
    NonVirtual,
    /// Type-level member.
    Static,
}

/// What a member is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Ordinary method.
    Method,
    /// Property getter (`get_<property>`).
    Getter {
        /// Property name.
        property: String,
    },
    /// Property setter (`set_<property>`).
    Setter {
        /// Property name.
        property: String,
    },
    /// Finalizer-like cleanup hook.
    Finalizer,
}

/// How an argument crosses the call boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamMode {
    /// Passed by value.
    Value,
    /// Passed by reference: copied in and copied back out.
    Ref,
    /// Output-only: copied back out.
    Out,
}

impl ParamMode {
    /// Whether the parameter is passed through a carrier.
    pub const fn is_by_ref(self) -> bool {
        matches!(self, Self::Ref | Self::Out)
    }
}

/// Property accessors to declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// Getter only.
    Read,
    /// Setter only.
    Write,
    /// Getter and setter.
    ReadWrite,
}

/// A declared member parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    ty: TypeHandle,
    mode: ParamMode,
}

impl Parameter {
    /// Parameter `name` of type `ty`.
    pub fn new(name: impl Into<String>, ty: &TypeHandle, mode: ParamMode) -> Self {
        Self {
            name: name.into(),
            ty: ty.clone(),
            mode,
        }
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    pub fn ty(&self) -> &TypeHandle {
        &self.ty
    }

    /// Passing mode.
    pub fn mode(&self) -> ParamMode {
        self.mode
    }
}

/// A declared member of a type.
#[derive(Clone)]
pub struct MemberDescriptor {
    name: String,
    kind: MemberKind,
    visibility: Visibility,
    dispatch: Dispatch,
    generic_arity: usize,
    params: Vec<Parameter>,
    returns: Option<TypeHandle>,
    body: Option<MemberBody>,
}

impl MemberDescriptor {
    /// Start describing a method. Defaults: public, abstract, void, no
    /// parameters.
    pub fn method(name: impl Into<String>) -> MemberBuilder {
        MemberBuilder::new(name.into(), MemberKind::Method)
    }

    /// Member name as seen by the dispatcher.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member kind.
    pub fn kind(&self) -> &MemberKind {
        &self.kind
    }

    /// Accessibility.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Virtual-dispatch participation.
    pub fn dispatch(&self) -> Dispatch {
        self.dispatch
    }

    /// Number of generic type parameters.
    pub fn generic_arity(&self) -> usize {
        self.generic_arity
    }

    /// Declared parameters.
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// Declared return type; `None` for void members.
    pub fn returns(&self) -> Option<&TypeHandle> {
        self.returns.as_ref()
    }

    /// Concrete implementation, if any.
    pub fn body(&self) -> Option<&MemberBody> {
        self.body.as_ref()
    }

    /// Whether the member has no implementation.
    pub fn is_abstract(&self) -> bool {
        self.dispatch == Dispatch::Abstract || self.body.is_none()
    }

    /// Same name, generic arity, parameter types and modes.
    ///
    /// Return types do not take part, matching override resolution.
    pub fn same_signature(&self, other: &MemberDescriptor) -> bool {
        self.name == other.name
            && self.generic_arity == other.generic_arity
            && self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|(a, b)| a.ty == b.ty && a.mode == b.mode)
    }

    /// Rendered signature, e.g. `convert<1>(i32, out String) -> bool`.
    pub fn signature(&self) -> String {
        let mut out = self.name.clone();
        if self.generic_arity > 0 {
            out.push_str(&format!("<{}>", self.generic_arity));
        }
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| match p.mode {
                ParamMode::Value => p.ty.name().to_owned(),
                ParamMode::Ref => format!("ref {}", p.ty.name()),
                ParamMode::Out => format!("out {}", p.ty.name()),
            })
            .collect();
        out.push_str(&format!("({})", params.join(", ")));
        if let Some(ret) = &self.returns {
            out.push_str(&format!(" -> {}", ret.name()));
        }
        out
    }
}

impl fmt::Debug for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("signature", &self.signature())
            .field("kind", &self.kind)
            .field("visibility", &self.visibility)
            .field("dispatch", &self.dispatch)
            .finish_non_exhaustive()
    }
}

/// Builder for [`MemberDescriptor`].
///
/// All methods take `self` by value and return `Self` for chaining.
#[derive(Clone)]
pub struct MemberBuilder {
    member: MemberDescriptor,
}

impl MemberBuilder {
    fn new(name: String, kind: MemberKind) -> Self {
        Self {
            member: MemberDescriptor {
                name,
                kind,
                visibility: Visibility::Public,
                dispatch: Dispatch::Abstract,
                generic_arity: 0,
                params: Vec::new(),
                returns: None,
                body: None,
            },
        }
    }

    /// Append a parameter.
    pub fn param(mut self, name: impl Into<String>, ty: &TypeHandle, mode: ParamMode) -> Self {
        self.member.params.push(Parameter::new(name, ty, mode));
        self
    }

    /// Declare the return type.
    pub fn returns(mut self, ty: &TypeHandle) -> Self {
        self.member.returns = Some(ty.clone());
        self
    }

    /// Declare `arity` generic type parameters.
    pub fn generic_arity(mut self, arity: usize) -> Self {
        self.member.generic_arity = arity;
        self
    }

    /// Set accessibility.
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.member.visibility = visibility;
        self
    }

    /// Set virtual-dispatch participation.
    pub fn dispatch(mut self, dispatch: Dispatch) -> Self {
        self.member.dispatch = dispatch;
        self
    }

    /// Attach an implementation. An abstract member becomes virtual.
    pub fn body<F>(mut self, body: F) -> Self
    where
        F: Fn(&FakeObject, &Arguments) -> Result<Value, Fault> + Send + Sync + 'static,
    {
        self.member.body = Some(Arc::new(body));
        if self.member.dispatch == Dispatch::Abstract {
            self.member.dispatch = Dispatch::Virtual;
        }
        self
    }

    /// Mark the member as a finalizer-like hook.
    pub fn finalizer(mut self) -> Self {
        self.member.kind = MemberKind::Finalizer;
        self
    }

    /// Finish.
    pub fn build(self) -> MemberDescriptor {
        self.member
    }
}

/// Immutable description of a type.
pub struct TypeDescriptor {
    name: String,
    kind: TypeKind,
    sealed: bool,
    open_generic: bool,
    visibility: Visibility,
    parent: Option<TypeHandle>,
    interfaces: Vec<TypeHandle>,
    members: Vec<Arc<MemberDescriptor>>,
    rust_type: Option<TypeId>,
    default: OnceLock<DefaultFn>,
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("sealed", &self.sealed)
            .field("members", &self.members.len())
            .finish_non_exhaustive()
    }
}

/// Shared handle to a [`TypeDescriptor`]. Equality and hashing are by
/// identity.
#[derive(Clone)]
pub struct TypeHandle(Arc<TypeDescriptor>);

static CATALOG: OnceLock<Mutex<HashMap<TypeId, TypeHandle>>> = OnceLock::new();
static OBJECT: OnceLock<TypeHandle> = OnceLock::new();
static FAKED: OnceLock<TypeHandle> = OnceLock::new();
static WILDCARD: OnceLock<TypeHandle> = OnceLock::new();

impl TypeHandle {
    fn from_descriptor(descriptor: TypeDescriptor) -> Self {
        Self(Arc::new(descriptor))
    }

    /// Interned descriptor for the native Rust type `T`.
    ///
    /// Native types are sealed value types named after
    /// [`std::any::type_name`].
    pub fn of<T: Any>() -> Self {
        let catalog = CATALOG.get_or_init(|| Mutex::new(HashMap::new()));
        let mut catalog = catalog.lock().unwrap_or_else(PoisonError::into_inner);
        catalog
            .entry(TypeId::of::<T>())
            .or_insert_with(|| {
                let mut builder = TypeBuilder::new(std::any::type_name::<T>(), TypeKind::ValueType);
                builder.rust_type = Some(TypeId::of::<T>());
                builder.build()
            })
            .clone()
    }

    /// [`TypeHandle::of`] with `T::default()` registered as the type default.
    pub fn of_default<T: DynValue + Default>() -> Self {
        let handle = Self::of::<T>();
        let default: DefaultFn = Arc::new(|| Value::of(T::default()));
        let _ = handle.0.default.set(default);
        handle
    }

    /// Universal base type, used when no parent is requested.
    ///
    /// Declares an overridable `to_string() -> String` (whose base body
    /// returns the synthesized type name) and a finalizer.
    pub fn object() -> Self {
        OBJECT
            .get_or_init(|| {
                let string = Self::of_default::<String>();
                TypeBuilder::class("object")
                    .member(
                        MemberDescriptor::method("to_string")
                            .returns(&string)
                            .body(|this, _| Ok(Value::of(this.synthesized_type().name().to_owned())))
                            .build(),
                    )
                    .member(
                        MemberDescriptor::method("finalize")
                            .visibility(Visibility::Internal {
                                visible_to_fakes: true,
                            })
                            .finalizer()
                            .body(|_, _| Ok(Value::Null))
                            .build(),
                    )
                    .build()
            })
            .clone()
    }

    /// Dispatch-access interface implemented by every synthesized type.
    ///
    /// Its members are never overridden.
    pub fn faked() -> Self {
        FAKED
            .get_or_init(|| {
                TypeBuilder::interface("decoy::Faked")
                    .member(MemberDescriptor::method("dispatcher").build())
                    .build()
            })
            .clone()
    }

    /// Placeholder type turned into a generic wildcard when a setup statement
    /// is compiled.
    pub fn wildcard() -> Self {
        WILDCARD
            .get_or_init(|| TypeBuilder::class("?").sealed().build())
            .clone()
    }

    /// Whether this is the [`TypeHandle::wildcard`] placeholder.
    pub fn is_wildcard(&self) -> bool {
        WILDCARD.get().is_some_and(|wildcard| wildcard == self)
    }

    /// Type name.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Type kind.
    pub fn kind(&self) -> TypeKind {
        self.0.kind
    }

    /// Whether this is an interface.
    pub fn is_interface(&self) -> bool {
        self.0.kind == TypeKind::Interface
    }

    /// Whether the type cannot be inherited from.
    pub fn is_sealed(&self) -> bool {
        self.0.sealed || self.0.kind == TypeKind::ValueType
    }

    /// Whether the type still has unbound generic parameters.
    pub fn is_open_generic(&self) -> bool {
        self.0.open_generic
    }

    /// Accessibility.
    pub fn visibility(&self) -> Visibility {
        self.0.visibility
    }

    /// Direct parent type.
    pub fn parent(&self) -> Option<&TypeHandle> {
        self.0.parent.as_ref()
    }

    /// Directly implemented (or, for interfaces, extended) interfaces.
    pub fn interfaces(&self) -> &[TypeHandle] {
        &self.0.interfaces
    }

    /// Members declared on this type.
    pub fn members(&self) -> &[Arc<MemberDescriptor>] {
        &self.0.members
    }

    /// Backing Rust type, for native types.
    pub fn rust_type(&self) -> Option<TypeId> {
        self.0.rust_type
    }

    /// The type default, when one is registered.
    pub fn default_value(&self) -> Option<Value> {
        self.0.default.get().map(|make| make())
    }

    /// This type followed by its parent chain. Every class chain ends at the
    /// universal base.
    pub fn lineage(&self) -> Vec<TypeHandle> {
        let mut out = vec![self.clone()];
        let mut current = self.parent().cloned();
        while let Some(ty) = current {
            current = ty.parent().cloned();
            out.push(ty);
        }
        let object = Self::object();
        if out.last().is_some_and(|root| root.kind() == TypeKind::Class && *root != object) {
            out.push(object);
        }
        out
    }

    /// Every interface reachable from this type, de-duplicated, in discovery
    /// order.
    pub fn all_interfaces(&self) -> Vec<TypeHandle> {
        let mut out: Vec<TypeHandle> = Vec::new();
        let mut pending: Vec<TypeHandle> = Vec::new();
        for ty in self.lineage() {
            if ty.is_interface() {
                pending.push(ty.clone());
            }
            pending.extend(ty.interfaces().iter().cloned());
        }
        pending.reverse();
        while let Some(ty) = pending.pop() {
            if out.contains(&ty) {
                continue;
            }
            pending.extend(ty.interfaces().iter().rev().cloned());
            out.push(ty);
        }
        out
    }

    /// Whether a value of this type can stand in for `target`.
    pub fn is_assignable_to(&self, target: &TypeHandle) -> bool {
        self.lineage().contains(target) || self.all_interfaces().contains(target)
    }

    /// First member with the same signature as `member`, searching this type,
    /// its parents, then its interfaces.
    pub fn find_member(&self, member: &MemberDescriptor) -> Option<Arc<MemberDescriptor>> {
        self.lineage()
            .into_iter()
            .chain(self.all_interfaces())
            .find_map(|ty| {
                ty.members()
                    .iter()
                    .find(|candidate| candidate.same_signature(member))
                    .cloned()
            })
    }

    fn address(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for TypeHandle {}

impl Hash for TypeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address().hash(state);
    }
}

impl PartialOrd for TypeHandle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeHandle {
    /// By name, then by identity.
    fn cmp(&self, other: &Self) -> Ordering {
        self.name()
            .cmp(other.name())
            .then_with(|| self.address().cmp(&other.address()))
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Builder for [`TypeHandle`]s.
///
/// # Example
///
/// ```
/// use decoy_core::{MemberDescriptor, ParamMode, TypeBuilder, TypeHandle};
///
/// let int = TypeHandle::of_default::<i32>();
/// let calc = TypeBuilder::interface("Calculator")
///     .member(
///         MemberDescriptor::method("calc")
///             .param("x", &int, ParamMode::Value)
///             .returns(&int)
///             .build(),
///     )
///     .build();
/// assert!(calc.is_interface());
/// ```
pub struct TypeBuilder {
    name: String,
    kind: TypeKind,
    sealed: bool,
    open_generic: bool,
    visibility: Visibility,
    parent: Option<TypeHandle>,
    interfaces: Vec<TypeHandle>,
    members: Vec<Arc<MemberDescriptor>>,
    rust_type: Option<TypeId>,
    default: Option<DefaultFn>,
}

impl TypeBuilder {
    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            sealed: false,
            open_generic: false,
            visibility: Visibility::Public,
            parent: None,
            interfaces: Vec::new(),
            members: Vec::new(),
            rust_type: None,
            default: None,
        }
    }

    /// Describe a class.
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    /// Describe an interface.
    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    /// Describe a value type.
    pub fn value_type(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::ValueType)
    }

    /// Describe a pointer type.
    pub fn pointer(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Pointer)
    }

    /// Forbid inheritance.
    pub fn sealed(mut self) -> Self {
        self.sealed = true;
        self
    }

    /// Mark generic parameters as unbound.
    pub fn open_generic(mut self) -> Self {
        self.open_generic = true;
        self
    }

    /// Set accessibility.
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Set the parent type.
    pub fn parent(mut self, parent: &TypeHandle) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Implement (or, for interfaces, extend) `interface`.
    pub fn implements(mut self, interface: &TypeHandle) -> Self {
        self.interfaces.push(interface.clone());
        self
    }

    /// Declare a member.
    pub fn member(mut self, member: MemberDescriptor) -> Self {
        self.members.push(Arc::new(member));
        self
    }

    /// Declare an abstract property as `get_<name>` / `set_<name>` accessors.
    pub fn property(mut self, name: &str, ty: &TypeHandle, access: Access) -> Self {
        if matches!(access, Access::Read | Access::ReadWrite) {
            let mut getter = MemberBuilder::new(
                format!("get_{name}"),
                MemberKind::Getter {
                    property: name.to_owned(),
                },
            );
            getter = getter.returns(ty);
            self.members.push(Arc::new(getter.build()));
        }
        if matches!(access, Access::Write | Access::ReadWrite) {
            let setter = MemberBuilder::new(
                format!("set_{name}"),
                MemberKind::Setter {
                    property: name.to_owned(),
                },
            )
            .param("value", ty, ParamMode::Value);
            self.members.push(Arc::new(setter.build()));
        }
        self
    }

    /// Register the type default.
    pub fn default_value<F>(mut self, make: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(Arc::new(make));
        self
    }

    /// Finish.
    pub fn build(self) -> TypeHandle {
        let default = OnceLock::new();
        if let Some(make) = self.default {
            let _ = default.set(make);
        }
        TypeHandle::from_descriptor(TypeDescriptor {
            name: self.name,
            kind: self.kind,
            sealed: self.sealed,
            open_generic: self.open_generic,
            visibility: self.visibility,
            parent: self.parent,
            interfaces: self.interfaces,
            members: self.members,
            rust_type: self.rust_type,
            default,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn native_types_are_interned() {
        assert_eq!(TypeHandle::of::<i32>(), TypeHandle::of::<i32>());
        assert_ne!(TypeHandle::of::<i32>(), TypeHandle::of::<u32>());
        assert!(TypeHandle::of::<i32>().is_sealed());
    }

    #[test]
    fn of_default_registers_default_value() {
        let int = TypeHandle::of_default::<i64>();
        assert_eq!(int.default_value(), Some(Value::of(0_i64)));
        assert!(TypeBuilder::class("Plain").build().default_value().is_none());
    }

    #[test]
    fn identical_descriptions_are_distinct_types() {
        let a = TypeBuilder::interface("Same").build();
        let b = TypeBuilder::interface("Same").build();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn property_declares_accessor_pair() {
        let int = TypeHandle::of_default::<i32>();
        let ty = TypeBuilder::interface("HasLevel")
            .property("level", &int, Access::ReadWrite)
            .build();
        let names: Vec<&str> = ty.members().iter().map(|m| m.name()).collect();
        assert_eq!(names, ["get_level", "set_level"]);
        assert_eq!(ty.members()[0].returns(), Some(&int));
        assert_eq!(ty.members()[1].params().len(), 1);
    }

    #[test]
    fn assignability_follows_parents_and_interfaces() {
        let root = TypeBuilder::interface("Root").build();
        let leaf = TypeBuilder::interface("Leaf").implements(&root).build();
        let base = TypeBuilder::class("Base").implements(&leaf).build();
        let derived = TypeBuilder::class("Derived").parent(&base).build();
        assert!(derived.is_assignable_to(&base));
        assert!(derived.is_assignable_to(&root));
        assert!(!base.is_assignable_to(&derived));
        assert_eq!(derived.all_interfaces(), vec![leaf, root]);
    }

    #[test]
    fn find_member_searches_parents() {
        let string = TypeHandle::of_default::<String>();
        let base = TypeBuilder::class("Base")
            .member(
                MemberDescriptor::method("name")
                    .returns(&string)
                    .body(|_, _| Ok(Value::of(String::from("base"))))
                    .build(),
            )
            .build();
        let derived = TypeBuilder::class("Derived").parent(&base).build();
        let query = MemberDescriptor::method("name").returns(&string).build();
        let found = derived.find_member(&query).expect("inherited member");
        assert!(!found.is_abstract());
        assert!(derived
            .find_member(&MemberDescriptor::method("other").build())
            .is_none());
    }

    #[test]
    fn signature_renders_modes_and_arity() {
        let int = TypeHandle::of_default::<i32>();
        let member = MemberDescriptor::method("parse")
            .generic_arity(1)
            .param("input", &int, ParamMode::Ref)
            .param("result", &int, ParamMode::Out)
            .build();
        assert_eq!(member.signature(), "parse<1>(ref i32, out i32)");
    }
}
