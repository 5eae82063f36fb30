// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fluent setup/verify front end and the fake factory.

use crate::arg::SetupScope;
use crate::behavior::Behavior;
use crate::call::CallRecord;
use crate::dispatcher::{Contract, Dispatcher};
use crate::error::{Fault, SetupError};
use crate::object::FakeObject;
use crate::settings::{FakeMode, FakeSettings};
use crate::synth::synthesize;
use crate::times::Times;
use crate::types::TypeHandle;
use std::sync::Arc;

/// Anything backed by a [`FakeObject`].
///
/// Setup and verify statements are closures that call the fake exactly once,
/// using the [`SetupScope`] to stand in matchers for arguments:
///
/// ```
/// use decoy_core::{Behavior, Faked, Times};
/// use decoy_dry_tests::{Calculator, FakeCalculator};
///
/// let fake = FakeCalculator::new();
/// fake.setup(|arg, fake| fake.calc(arg.any()), Behavior::returns(7_i32))
///     .unwrap();
/// assert_eq!(fake.calc(3), 7);
/// fake.verify(Times::once(), |_, fake| fake.calc(3)).unwrap();
/// ```
pub trait Faked {
    /// The backing fake instance.
    fn fake_object(&self) -> &FakeObject;

    /// The backing dispatcher.
    fn dispatcher(&self) -> &Dispatcher {
        self.fake_object().dispatcher()
    }

    /// Register `behavior` for the call `statement` makes.
    ///
    /// # Errors
    /// [`Fault::Setup`] when the statement does not call the fake exactly once
    /// or leaves matchers unused.
    fn setup<F, R>(&self, statement: F, behavior: impl Into<Behavior>) -> Result<Arc<Contract>, Fault>
    where
        Self: Sized,
        F: FnOnce(&SetupScope, &Self) -> R,
    {
        let pattern = record(self, statement)?;
        Ok(self.dispatcher().setup(pattern, behavior))
    }

    /// Check how often the call `statement` makes has happened.
    ///
    /// # Errors
    /// [`Fault::Setup`] as for [`Faked::setup`], or [`Fault::Verification`]
    /// when the count is outside `times`.
    fn verify<F, R>(&self, times: Times, statement: F) -> Result<(), Fault>
    where
        Self: Sized,
        F: FnOnce(&SetupScope, &Self) -> R,
    {
        let pattern = record(self, statement)?;
        self.dispatcher().verify(times, Some(&pattern))
    }

    /// Check the total number of calls.
    ///
    /// # Errors
    /// [`Fault::Verification`] when the total is outside `times`.
    fn verify_total(&self, times: Times) -> Result<(), Fault> {
        self.dispatcher().verify(times, None)
    }

    /// Check every contract against its own range, and optionally the total.
    ///
    /// # Errors
    /// [`Fault::Contracts`] listing every violation.
    fn verify_all(&self, total: Option<Times>) -> Result<(), Fault> {
        self.dispatcher().verify_all(total)
    }
}

impl Faked for FakeObject {
    fn fake_object(&self) -> &FakeObject {
        self
    }
}

fn record<T, F, R>(fake: &T, statement: F) -> Result<CallRecord, Fault>
where
    T: Faked,
    F: FnOnce(&SetupScope, &T) -> R,
{
    let scope = SetupScope::new();
    let recording = Recording::begin(fake.dispatcher());
    drop(statement(&scope, fake));
    let mut recorded = recording.finish();
    if recorded.len() > 1 {
        return Err(SetupError::MultipleCallsRecorded(recorded.len()).into());
    }
    let call = recorded.pop().ok_or(SetupError::NoCallRecorded)?;
    Ok(scope.compile(call)?)
}

/// Recording mode for the duration of one statement, ended on drop so a
/// panicking statement cannot leave the dispatcher recording.
struct Recording<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> Recording<'a> {
    fn begin(dispatcher: &'a Dispatcher) -> Self {
        dispatcher.begin_recording();
        Self { dispatcher }
    }

    fn finish(self) -> Vec<CallRecord> {
        self.dispatcher.end_recording()
    }
}

impl Drop for Recording<'_> {
    fn drop(&mut self) {
        if self.dispatcher.is_recording() {
            drop(self.dispatcher.end_recording());
        }
    }
}

/// Entry point for creating fakes of runtime-described types.
///
/// ```
/// use decoy_core::{FakeFactory, FakeMode, TypeBuilder};
///
/// let marker = TypeBuilder::interface("Marker").build();
/// let fake = FakeFactory::new().stub(&[marker.clone()]).unwrap();
/// assert_eq!(fake.dispatcher().mode(), FakeMode::Lenient);
/// assert!(fake.synthesized_type().implements(&marker));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeFactory {
    settings: FakeSettings,
}

impl FakeFactory {
    /// Factory producing strict fakes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory applying `settings` to every fake.
    pub fn with_settings(settings: FakeSettings) -> Self {
        Self { settings }
    }

    /// Settings applied to created fakes.
    pub fn settings(&self) -> FakeSettings {
        self.settings
    }

    /// Fake deriving from `parent` (or the universal base) and implementing
    /// `interfaces`.
    ///
    /// # Errors
    /// [`Fault::Synthesis`] for invalid requests.
    pub fn create(&self, parent: Option<&TypeHandle>, interfaces: &[TypeHandle]) -> Result<FakeObject, Fault> {
        Ok(synthesize(parent, interfaces)?.instantiate(self.settings))
    }

    /// Strict fake implementing `interfaces`.
    ///
    /// # Errors
    /// See [`FakeFactory::create`].
    pub fn mock(&self, interfaces: &[TypeHandle]) -> Result<FakeObject, Fault> {
        self.with_mode(FakeMode::Strict).create(None, interfaces)
    }

    /// Lenient fake implementing `interfaces`.
    ///
    /// # Errors
    /// See [`FakeFactory::create`].
    pub fn stub(&self, interfaces: &[TypeHandle]) -> Result<FakeObject, Fault> {
        self.with_mode(FakeMode::Lenient).create(None, interfaces)
    }

    fn with_mode(self, mode: FakeMode) -> Self {
        Self {
            settings: FakeSettings { mode, ..self.settings },
        }
    }
}
