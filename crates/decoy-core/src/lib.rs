// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! decoy-core: fake type synthesis and call-contract verification.
//!
//! Rust has no runtime reflection, so the engine works over its own runtime
//! type model ([`TypeHandle`] / [`TypeDescriptor`]). [`synthesize`] turns a
//! parent type plus a set of interfaces into a [`SynthesizedType`] whose every
//! overridable member forwards into the [`Dispatcher`] owned by each
//! [`FakeObject`]. Test code registers [`Behavior`]s against call patterns and
//! later verifies the observed calls against [`Times`] ranges.
//!
//! For Rust traits, the [`fake!`] macro generates a forwarding adapter on top
//! of the same machinery.
//!
//! # Thread safety
//!
//! The synthesis cache and the native type catalog are process-wide and
//! mutex-guarded. A fake's dispatcher is not: fakes are `!Sync`, so a fake
//! shared across threads must be serialized externally (e.g. behind a
//! `Mutex`).
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::unreadable_literal,
    clippy::missing_const_for_fn,
    clippy::suboptimal_flops,
    clippy::redundant_pub_crate,
    clippy::many_single_char_names,
    clippy::module_name_repetitions,
    clippy::use_self
)]

mod arg;
mod behavior;
mod call;
mod carrier;
mod dispatcher;
mod error;
mod fake;
/// Slot helpers used by code generated with [`fake!`].
pub mod forward;
mod hint;
mod macros;
/// Override eligibility rules used by the synthesizer.
pub mod member;
mod object;
mod settings;
mod synth;
mod times;
mod types;
mod value;

/// Argument matchers and the per-statement setup scope.
pub use arg::{Arg, Matcher, Placeholder, SetupScope};
/// Configured responses bound to call patterns.
pub use behavior::{Behavior, Body, TypedBehavior};
/// Observed calls, patterns and the call log.
pub use call::{CallLog, CallRecord, GenericArg, Slot};
/// By-reference parameter carrier.
pub use carrier::RefCarrier;
/// Per-instance dispatcher and verifier.
pub use dispatcher::{Contract, Dispatcher, DispatcherId};
/// Error taxonomy.
pub use error::{
    ContractViolation, ContractViolations, Fault, SetupError, SettingsError, SynthesisError,
    UnmatchedCall, VerificationFailure,
};
/// Fluent front end and fake factory.
pub use fake::{FakeFactory, Faked};
/// Tagged optional results and default-value providers.
pub use hint::{DeclaredDefaults, DefaultProvider, Hint};
/// Fake instances and the override forwarding machinery.
pub use object::{Argument, Arguments, FakeObject};
/// Engine configuration.
pub use settings::{FakeMode, FakeSettings};
/// Type synthesis and the process-wide cache.
pub use synth::{synthesize, Override, PropertySlots, SynthesizedType, TypeCache};
/// Call-count ranges.
pub use times::Times;
/// Runtime type model.
pub use types::{
    Access, DefaultFn, Dispatch, MemberBody, MemberBuilder, MemberDescriptor, MemberKind,
    ParamMode, Parameter, TypeBuilder, TypeDescriptor, TypeHandle, TypeKind, Visibility,
};
/// Dynamically typed values.
pub use value::{DynValue, StructuralComparer, Value, ValueComparer};
