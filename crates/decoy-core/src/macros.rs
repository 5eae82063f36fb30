// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `fake!`: forwarding adapters for Rust traits.

/// Generate a fake implementing a Rust trait.
///
/// Every listed method forwards through [`FakeObject::invoke`](crate::FakeObject::invoke)
/// of a fake synthesized from an interface descriptor built once per
/// generated type. Parameters are passed by value, or as `&mut T` when marked
/// `#ref` (copied in and back) or `#out` (copied back only). Return types must
/// implement `Default + Clone`; engine faults panic, since trait signatures
/// cannot carry them.
///
/// ```
/// use decoy_core::{fake, Behavior, Faked, Times};
///
/// pub trait Greeter {
///     fn greet(&self, name: String) -> String;
///     fn last(&self, out: &mut String);
/// }
///
/// fake! {
///     /// Fake greeter.
///     pub struct FakeGreeter: Greeter {
///         fn greet(&self, name: String) -> String;
///         fn last(&self, #out out: String);
///     }
/// }
///
/// let fake = FakeGreeter::new();
/// fake.setup(|arg, f| f.greet(arg.any()), Behavior::returns(String::from("hi"))).unwrap();
/// fake.setup(
///     |_, f| f.last(&mut String::new()),
///     Behavior::new(|args| {
///         args.set(0, String::from("bob"))?;
///         Ok(decoy_core::Value::Null)
///     }),
/// )
/// .unwrap();
///
/// assert_eq!(fake.greet(String::from("bob")), "hi");
/// let mut out = String::new();
/// fake.last(&mut out);
/// assert_eq!(out, "bob");
/// fake.verify(Times::once(), |arg, f| f.greet(arg.any())).unwrap();
/// ```
#[macro_export]
macro_rules! fake {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : $tr:path {
            $(
                fn $method:ident(&self $(, $(#$mode:ident)? $arg:ident : $argty:ty)*) $(-> $ret:ty)?;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        $vis struct $name {
            object: $crate::FakeObject,
        }

        impl $name {
            /// Runtime descriptor of the faked trait.
            pub fn interface_type() -> $crate::TypeHandle {
                static INTERFACE: ::std::sync::OnceLock<$crate::TypeHandle> =
                    ::std::sync::OnceLock::new();
                INTERFACE
                    .get_or_init(|| {
                        $crate::TypeBuilder::interface(stringify!($tr))
                            $(
                                .member(
                                    $crate::MemberDescriptor::method(stringify!($method))
                                        $(
                                            .param(
                                                stringify!($arg),
                                                &$crate::TypeHandle::of::<$argty>(),
                                                $crate::__decoy_mode!($($mode)?),
                                            )
                                        )*
                                        $(.returns(&$crate::TypeHandle::of_default::<$ret>()))?
                                        .build(),
                                )
                            )*
                            .build()
                    })
                    .clone()
            }

            /// Strict fake.
            pub fn new() -> Self {
                Self::with_settings($crate::FakeSettings::default())
            }

            /// Lenient fake.
            pub fn lenient() -> Self {
                Self::with_settings($crate::FakeSettings::lenient())
            }

            /// Fake configured by `settings`.
            pub fn with_settings(settings: $crate::FakeSettings) -> Self {
                let created = $crate::FakeFactory::with_settings(settings)
                    .create(None, &[Self::interface_type()]);
                Self {
                    object: $crate::forward::expect_fake(created),
                }
            }

            /// Backing fake instance.
            pub fn object(&self) -> &$crate::FakeObject {
                &self.object
            }
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $crate::Faked for $name {
            fn fake_object(&self) -> &$crate::FakeObject {
                &self.object
            }
        }

        impl $tr for $name {
            $(
                fn $method(&self $(, $arg: $crate::__decoy_param!($($mode)? $argty))*) $(-> $ret)? {
                    $( let mut $arg = $crate::__decoy_slot!($($mode)? $arg); )*
                    let result = {
                        let mut args: ::std::vec::Vec<$crate::Argument<'_>> =
                            ::std::vec![$($crate::forward::Forward::argument(&mut $arg)),*];
                        self.object.invoke(stringify!($method), &[], &mut args)
                    };
                    $( $crate::forward::Forward::restore($arg); )*
                    $crate::__decoy_return!(stringify!($method), result $(, $ret)?)
                }
            )*
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __decoy_mode {
    () => {
        $crate::ParamMode::Value
    };
    (ref) => {
        $crate::ParamMode::Ref
    };
    (out) => {
        $crate::ParamMode::Out
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __decoy_param {
    (ref $ty:ty) => { &mut $ty };
    (out $ty:ty) => { &mut $ty };
    ($ty:ty) => { $ty };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __decoy_slot {
    (ref $arg:ident) => {
        $crate::forward::RefSlot::new($arg)
    };
    (out $arg:ident) => {
        $crate::forward::OutSlot::new($arg)
    };
    ($arg:ident) => {
        $crate::forward::ValueSlot::new($arg)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __decoy_return {
    ($member:expr, $result:ident) => {
        $crate::forward::expect_unit($result)
    };
    ($member:expr, $result:ident, $ret:ty) => {
        $crate::forward::expect_value::<$ret>($member, $result)
    };
}
