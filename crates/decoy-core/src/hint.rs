// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tagged optional results and the default-value provider chain.

use crate::types::TypeHandle;
use crate::value::Value;
use std::sync::Arc;

/// Result of a hint query: either the provider does not handle the request or
/// it supplies a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hint<T> {
    /// Not handled; the next provider in the chain is asked.
    NotSupported,
    /// Handled with this value.
    Supported(T),
}

impl<T> Hint<T> {
    /// Whether a value was supplied.
    pub const fn is_supported(&self) -> bool {
        matches!(self, Self::Supported(_))
    }

    /// Convert to an `Option`.
    pub fn supported(self) -> Option<T> {
        match self {
            Self::NotSupported => None,
            Self::Supported(value) => Some(value),
        }
    }

    /// Keep `self` if supported, otherwise evaluate `next`.
    pub fn or_else(self, next: impl FnOnce() -> Self) -> Self {
        match self {
            Self::NotSupported => next(),
            supported @ Self::Supported(_) => supported,
        }
    }
}

impl<T> From<Option<T>> for Hint<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::NotSupported, Self::Supported)
    }
}

/// Supplies default values for declared return types.
///
/// Lenient fakes ask their provider chain (most recently pushed first) when
/// an unmatched call needs a return value.
pub trait DefaultProvider: Send + Sync {
    /// Default for `ty`, or [`Hint::NotSupported`].
    fn default_for(&self, ty: &TypeHandle) -> Hint<Value>;
}

/// Provider that answers with the type's registered default, if any.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredDefaults;

impl DefaultProvider for DeclaredDefaults {
    fn default_for(&self, ty: &TypeHandle) -> Hint<Value> {
        ty.default_value().into()
    }
}

impl<F> DefaultProvider for F
where
    F: Fn(&TypeHandle) -> Hint<Value> + Send + Sync,
{
    fn default_for(&self, ty: &TypeHandle) -> Hint<Value> {
        self(ty)
    }
}

/// First supported answer from `providers`, in order; [`Value::Null`] when
/// none applies.
pub(crate) fn resolve_default(providers: &[Arc<dyn DefaultProvider>], ty: &TypeHandle) -> Value {
    providers
        .iter()
        .find_map(|provider| provider.default_for(ty).supported())
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::types::TypeBuilder;

    #[test]
    fn or_else_keeps_first_supported() {
        let hint: Hint<i32> = Hint::NotSupported;
        assert_eq!(hint.or_else(|| Hint::Supported(2)), Hint::Supported(2));
        assert_eq!(Hint::Supported(1).or_else(|| Hint::Supported(2)), Hint::Supported(1));
    }

    #[test]
    fn chain_falls_through_to_declared_default() {
        let int = TypeHandle::of_default::<i32>();
        let decline = |_: &TypeHandle| -> Hint<Value> { Hint::NotSupported };
        let chain: [Arc<dyn DefaultProvider>; 2] = [Arc::new(decline), Arc::new(DeclaredDefaults)];
        assert_eq!(resolve_default(&chain, &int), Value::of(0_i32));
    }

    #[test]
    fn earlier_provider_wins() {
        let int = TypeHandle::of_default::<i32>();
        let seven = |_: &TypeHandle| -> Hint<Value> { Hint::Supported(Value::of(7_i32)) };
        let chain: [Arc<dyn DefaultProvider>; 2] = [Arc::new(seven), Arc::new(DeclaredDefaults)];
        assert_eq!(resolve_default(&chain, &int), Value::of(7_i32));
    }

    #[test]
    fn unknown_type_defaults_to_null() {
        let opaque = TypeBuilder::class("Opaque").build();
        let chain: [Arc<dyn DefaultProvider>; 1] = [Arc::new(DeclaredDefaults)];
        assert!(resolve_default(&chain, &opaque).is_null());
    }
}
