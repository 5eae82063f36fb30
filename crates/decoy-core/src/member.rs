// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Stateless override-eligibility rules.

use crate::types::{Dispatch, MemberDescriptor, MemberKind, Visibility};

/// Whether something with `visibility` can be seen by synthesized types.
///
/// Public members are always visible; internal ones only when their assembly
/// grants access to fakes.
pub const fn is_visible(visibility: Visibility) -> bool {
    match visibility {
        Visibility::Public => true,
        Visibility::Internal { visible_to_fakes } => visible_to_fakes,
        Visibility::Private => false,
    }
}

/// Whether `member` takes part in virtual dispatch and may be replaced.
pub const fn is_overridable_dispatch(dispatch: Dispatch) -> bool {
    matches!(dispatch, Dispatch::Abstract | Dispatch::Virtual)
}

/// Whether `member` is a finalizer-like cleanup hook.
pub fn is_finalizer(member: &MemberDescriptor) -> bool {
    matches!(member.kind(), MemberKind::Finalizer)
}

/// Whether a synthesized type overrides `member`.
pub fn is_overridable(member: &MemberDescriptor) -> bool {
    is_visible(member.visibility())
        && is_overridable_dispatch(member.dispatch())
        && !is_finalizer(member)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeHandle;
    use crate::value::Value;

    fn method(dispatch: Dispatch, visibility: Visibility) -> MemberDescriptor {
        MemberDescriptor::method("m")
            .returns(&TypeHandle::of::<i32>())
            .visibility(visibility)
            .dispatch(dispatch)
            .build()
    }

    #[test]
    fn abstract_and_virtual_public_members_are_eligible() {
        assert!(is_overridable(&method(Dispatch::Abstract, Visibility::Public)));
        assert!(is_overridable(&method(Dispatch::Virtual, Visibility::Public)));
    }

    #[test]
    fn sealed_dispatch_kinds_are_rejected() {
        for dispatch in [Dispatch::Final, Dispatch::NonVirtual, Dispatch::Static] {
            assert!(!is_overridable(&method(dispatch, Visibility::Public)));
        }
    }

    #[test]
    fn internal_members_need_a_grant() {
        let granted = Visibility::Internal {
            visible_to_fakes: true,
        };
        let hidden = Visibility::Internal {
            visible_to_fakes: false,
        };
        assert!(is_overridable(&method(Dispatch::Virtual, granted)));
        assert!(!is_overridable(&method(Dispatch::Virtual, hidden)));
        assert!(!is_overridable(&method(Dispatch::Virtual, Visibility::Private)));
    }

    #[test]
    fn finalizers_are_skipped() {
        let finalizer = MemberDescriptor::method("finalize")
            .finalizer()
            .body(|_, _| Ok(Value::Null))
            .build();
        assert!(!is_overridable(&finalizer));
    }
}
