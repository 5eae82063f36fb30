// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Type synthesis and the process-wide type cache.
//!
//! A synthesized type is identified by its parent and its sorted,
//! de-duplicated interface set. Exactly one [`SynthesizedType`] exists per
//! key in a cache; requesting a set-equal key in any order returns the same
//! `Arc`. The cache lives for the whole process and is never torn down.

use crate::error::SynthesisError;
use crate::member;
use crate::object::FakeObject;
use crate::settings::FakeSettings;
use crate::types::{MemberDescriptor, MemberKind, ParamMode, TypeHandle, TypeKind};
use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::{info, instrument};

/// Cache key: parent plus sorted, de-duplicated interfaces.
type CacheKey = (TypeHandle, Vec<TypeHandle>);

static GLOBAL: OnceLock<TypeCache> = OnceLock::new();
static NEXT_TYPE_ID: AtomicU64 = AtomicU64::new(1);

/// One overridden member of a synthesized type.
#[derive(Debug, Clone)]
pub struct Override {
    member: Arc<MemberDescriptor>,
    declared_by: TypeHandle,
}

impl Override {
    /// The overridden member.
    pub fn member(&self) -> &Arc<MemberDescriptor> {
        &self.member
    }

    /// Type that declared the member.
    pub fn declared_by(&self) -> &TypeHandle {
        &self.declared_by
    }

    fn fits(&self, name: &str, generics: usize, shapes: &[(ParamMode, Option<TypeId>)]) -> bool {
        let member = &self.member;
        member.name() == name
            && member.generic_arity() == generics
            && member.params().len() == shapes.len()
            && member
                .params()
                .iter()
                .zip(shapes)
                .all(|(param, (mode, payload))| {
                    param.mode() == *mode
                        && match (param.ty().rust_type(), payload) {
                            (Some(expected), Some(actual)) => expected == *actual,
                            _ => true,
                        }
                })
    }
}

/// Override indices of a property's accessors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropertySlots {
    /// Getter override index.
    pub getter: Option<usize>,
    /// Setter override index.
    pub setter: Option<usize>,
}

/// A runtime-defined type that overrides every eligible inherited member.
#[derive(Debug)]
pub struct SynthesizedType {
    id: u64,
    name: String,
    fingerprint: String,
    parent: TypeHandle,
    interfaces: Vec<TypeHandle>,
    overrides: Vec<Override>,
    properties: BTreeMap<String, PropertySlots>,
}

impl SynthesizedType {
    fn build(parent: &TypeHandle, interfaces: &[TypeHandle]) -> Self {
        let faked = TypeHandle::faked();
        let mut sources: Vec<TypeHandle> = Vec::new();
        let reachable = parent
            .lineage()
            .into_iter()
            .chain(parent.all_interfaces())
            .chain(interfaces.iter().flat_map(TypeHandle::all_interfaces));
        for ty in reachable {
            if ty != faked && !sources.contains(&ty) {
                sources.push(ty);
            }
        }

        // Most-derived declarations come first, so a sealed redeclaration hides
        // the virtual member it replaces.
        let mut seen: Vec<&Arc<MemberDescriptor>> = Vec::new();
        let mut overrides = Vec::new();
        for ty in &sources {
            for candidate in ty.members() {
                if seen.iter().any(|member| member.same_signature(candidate)) {
                    continue;
                }
                seen.push(candidate);
                if member::is_overridable(candidate) {
                    overrides.push(Override {
                        member: Arc::clone(candidate),
                        declared_by: ty.clone(),
                    });
                }
            }
        }

        let mut properties: BTreeMap<String, PropertySlots> = BTreeMap::new();
        for (index, slot) in overrides.iter().enumerate() {
            match slot.member.kind() {
                MemberKind::Getter { property } => {
                    properties.entry(property.clone()).or_default().getter = Some(index);
                }
                MemberKind::Setter { property } => {
                    properties.entry(property.clone()).or_default().setter = Some(index);
                }
                MemberKind::Method | MemberKind::Finalizer => {}
            }
        }

        let mut hasher = blake3::Hasher::new();
        hasher.update(b"decoy-type:");
        hasher.update(parent.name().as_bytes());
        for interface in interfaces {
            hasher.update(&[0]);
            hasher.update(interface.name().as_bytes());
        }
        let fingerprint = hex::encode(hasher.finalize().as_bytes());

        let mut names = vec![parent.name()];
        names.extend(interfaces.iter().map(TypeHandle::name));
        Self {
            id: NEXT_TYPE_ID.fetch_add(1, Ordering::Relaxed),
            name: format!("Fake<{}>", names.join(", ")),
            fingerprint,
            parent: parent.clone(),
            interfaces: interfaces.to_vec(),
            overrides,
            properties,
        }
    }

    /// Process-unique sequence number.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Generated name, e.g. `Fake<object, Calculator>`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hex BLAKE3 digest of the parent and interface names.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Parent type.
    pub fn parent(&self) -> &TypeHandle {
        &self.parent
    }

    /// Requested interfaces, sorted. The dispatch-access interface is implicit.
    pub fn interfaces(&self) -> &[TypeHandle] {
        &self.interfaces
    }

    /// Every overridden member.
    pub fn overrides(&self) -> &[Override] {
        &self.overrides
    }

    /// Accessor slots of `property`.
    pub fn property(&self, property: &str) -> Option<PropertySlots> {
        self.properties.get(property).copied()
    }

    /// Names of all wired properties.
    pub fn properties(&self) -> impl Iterator<Item = &str> + '_ {
        self.properties.keys().map(String::as_str)
    }

    /// Whether instances can stand in for `ty`.
    pub fn implements(&self, ty: &TypeHandle) -> bool {
        *ty == TypeHandle::faked()
            || self.parent.is_assignable_to(ty)
            || self.interfaces.iter().any(|interface| interface.is_assignable_to(ty))
    }

    /// Whether some override is named `name`.
    pub fn overrides_member(&self, name: &str) -> bool {
        self.overrides.iter().any(|slot| slot.member.name() == name)
    }

    /// First override fitting the call shape: name, generic count, parameter
    /// modes and, where both sides are native, by-value payload types.
    pub fn resolve(
        &self,
        name: &str,
        generics: usize,
        shapes: &[(ParamMode, Option<TypeId>)],
    ) -> Option<&Override> {
        self.overrides
            .iter()
            .find(|slot| slot.fits(name, generics, shapes))
    }

    /// New instance with its own dispatcher.
    pub fn instantiate(self: &Arc<Self>, settings: FakeSettings) -> FakeObject {
        FakeObject::new(Arc::clone(self), settings)
    }
}

/// Cache of synthesized types keyed by `(parent, interface set)`.
#[derive(Debug, Default)]
pub struct TypeCache {
    types: Mutex<HashMap<CacheKey, Arc<SynthesizedType>>>,
}

impl TypeCache {
    /// Private, empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide cache used by [`synthesize`].
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::new)
    }

    /// Number of cached types.
    pub fn len(&self) -> usize {
        self.types.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no type was synthesized yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached or newly built type for `parent` plus `interfaces`.
    ///
    /// An absent parent means the universal base type. An interface passed
    /// as parent is moved into the interface set.
    ///
    /// # Errors
    /// [`SynthesisError`] when the parent is sealed, a pointer, open generic
    /// or not visible, or when an interface entry is not a visible, closed
    /// interface.
    pub fn synthesize(
        &self,
        parent: Option<&TypeHandle>,
        interfaces: &[TypeHandle],
    ) -> Result<Arc<SynthesizedType>, SynthesisError> {
        let key = normalize(parent, interfaces)?;
        let mut types = self.types.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = types.get(&key) {
            return Ok(Arc::clone(existing));
        }
        let built = Arc::new(SynthesizedType::build(&key.0, &key.1));
        info!(
            name = built.name(),
            fingerprint = built.fingerprint(),
            overrides = built.overrides().len(),
            "synthesized fake type"
        );
        types.insert(key, Arc::clone(&built));
        Ok(built)
    }
}

/// Synthesize through the process-wide cache.
///
/// # Errors
/// See [`TypeCache::synthesize`].
#[instrument(level = "debug", skip_all, fields(interfaces = interfaces.len()))]
pub fn synthesize(
    parent: Option<&TypeHandle>,
    interfaces: &[TypeHandle],
) -> Result<Arc<SynthesizedType>, SynthesisError> {
    TypeCache::global().synthesize(parent, interfaces)
}

fn ensure_visible(ty: &TypeHandle) -> Result<(), SynthesisError> {
    if member::is_visible(ty.visibility()) {
        Ok(())
    } else {
        Err(SynthesisError::NotVisible {
            ty: ty.name().to_owned(),
        })
    }
}

fn ensure_interface(ty: &TypeHandle) -> Result<(), SynthesisError> {
    let name = || ty.name().to_owned();
    if !ty.is_interface() {
        return Err(SynthesisError::NotAnInterface { ty: name() });
    }
    if ty.is_open_generic() {
        return Err(SynthesisError::OpenGeneric { ty: name() });
    }
    ensure_visible(ty)
}

fn ensure_parent(ty: &TypeHandle) -> Result<(), SynthesisError> {
    let name = || ty.name().to_owned();
    if ty.kind() == TypeKind::Pointer {
        return Err(SynthesisError::Pointer { ty: name() });
    }
    if ty.is_sealed() {
        return Err(SynthesisError::Sealed { ty: name() });
    }
    if ty.is_open_generic() {
        return Err(SynthesisError::OpenGeneric { ty: name() });
    }
    ensure_visible(ty)
}

fn normalize(
    parent: Option<&TypeHandle>,
    interfaces: &[TypeHandle],
) -> Result<CacheKey, SynthesisError> {
    let mut set: Vec<TypeHandle> = Vec::with_capacity(interfaces.len() + 1);
    let parent = match parent {
        Some(ty) if ty.is_interface() => {
            set.push(ty.clone());
            TypeHandle::object()
        }
        Some(ty) => ty.clone(),
        None => TypeHandle::object(),
    };
    ensure_parent(&parent)?;
    set.extend(interfaces.iter().cloned());
    for interface in &set {
        ensure_interface(interface)?;
    }
    let faked = TypeHandle::faked();
    set.retain(|interface| *interface != faked);
    set.sort();
    set.dedup();
    Ok((parent, set))
}
