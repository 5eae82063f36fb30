// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-instance dispatcher and verifier.
//!
//! Every override of a synthesized type funnels into the instance's
//! [`Dispatcher`]. It appends the observed call to the log, scans the contract
//! stack most recent first and runs the first matching behavior. Calls nobody
//! configured either fail (strict) or produce the declared return type's
//! default (lenient). A call-base request is only honored once a contract has
//! matched: an unmatched call never reaches the base implementation.
//!
//! State lives in a `RefCell`. No borrow is held while a behavior body, a
//! matcher predicate or a base body runs, so bodies may call back into the
//! same fake.

use crate::behavior::Behavior;
use crate::call::{CallLog, CallRecord};
use crate::error::{ContractViolation, ContractViolations, Fault, UnmatchedCall, VerificationFailure};
use crate::hint::{resolve_default, DeclaredDefaults, DefaultProvider};
use crate::object::{Arguments, FakeObject};
use crate::settings::{FakeMode, FakeSettings};
use crate::times::Times;
use crate::types::{MemberDescriptor, TypeHandle};
use crate::value::{StructuralComparer, Value, ValueComparer};
use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

static NEXT_DISPATCHER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique dispatcher identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DispatcherId(u64);

impl DispatcherId {
    fn next() -> Self {
        Self(NEXT_DISPATCHER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DispatcherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A `(pattern, behavior)` pair registered through setup.
#[derive(Debug)]
pub struct Contract {
    pattern: CallRecord,
    behavior: Behavior,
}

impl Contract {
    /// Call pattern.
    pub fn pattern(&self) -> &CallRecord {
        &self.pattern
    }

    /// Configured behavior, including its call counter.
    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }
}

struct State {
    mode: FakeMode,
    trace_calls: bool,
    contracts: Vec<Arc<Contract>>,
    log: CallLog,
    recording: Option<Vec<CallRecord>>,
    defaults: Vec<Arc<dyn DefaultProvider>>,
}

/// Contract stack, call log and unmatched-call policy of one fake.
pub struct Dispatcher {
    id: DispatcherId,
    state: RefCell<State>,
    comparer: Arc<dyn ValueComparer>,
}

impl Dispatcher {
    /// Dispatcher configured from `settings`.
    pub fn new(settings: &FakeSettings) -> Self {
        Self {
            id: DispatcherId::next(),
            state: RefCell::new(State {
                mode: settings.mode,
                trace_calls: settings.trace_calls,
                contracts: Vec::new(),
                log: CallLog::default(),
                recording: None,
                defaults: vec![Arc::new(DeclaredDefaults) as Arc<dyn DefaultProvider>],
            }),
            comparer: Arc::new(StructuralComparer),
        }
    }

    /// Replace the value comparer used for literal pattern slots.
    pub fn with_comparer(mut self, comparer: Arc<dyn ValueComparer>) -> Self {
        self.comparer = comparer;
        self
    }

    /// Identifier, used for equality and hashing of fakes.
    pub fn id(&self) -> DispatcherId {
        self.id
    }

    /// Current unmatched-call policy.
    pub fn mode(&self) -> FakeMode {
        self.state.borrow().mode
    }

    /// Switch the unmatched-call policy. Takes effect on the next call.
    pub fn set_mode(&self, mode: FakeMode) {
        self.state.borrow_mut().mode = mode;
    }

    /// Register `behavior` for calls matching `pattern`.
    ///
    /// Later registrations shadow earlier overlapping ones.
    pub fn setup(&self, pattern: CallRecord, behavior: impl Into<Behavior>) -> Arc<Contract> {
        let behavior = behavior.into();
        debug!(
            dispatcher = %self.id,
            pattern = %pattern,
            times = %behavior.times(),
            "contract registered"
        );
        let contract = Arc::new(Contract { pattern, behavior });
        self.state.borrow_mut().contracts.push(Arc::clone(&contract));
        contract
    }

    /// Put a provider in front of the default-value chain.
    pub fn push_default_provider(&self, provider: impl DefaultProvider + 'static) {
        self.state.borrow_mut().defaults.insert(0, Arc::new(provider));
    }

    /// Default for `ty` from the provider chain; null when nobody supplies one.
    pub fn default_for(&self, ty: &TypeHandle) -> Value {
        let providers = self.state.borrow().defaults.clone();
        resolve_default(&providers, ty)
    }

    fn default_return(&self, member: &MemberDescriptor) -> Value {
        member
            .returns()
            .map_or(Value::Null, |returns| self.default_for(returns))
    }

    /// Route one call.
    ///
    /// # Errors
    /// - [`Fault::Unmatched`] for an unmatched call in strict mode.
    /// - [`Fault::BaseMemberMissing`] / [`Fault::BaseMemberAbstract`] when a
    ///   call-base request cannot be honored.
    /// - [`Fault::ShapeMismatch`] when a void member's behavior returns a
    ///   value.
    /// - A behavior body's own failure, unchanged.
    pub fn dispatch(
        &self,
        this: &FakeObject,
        member: &MemberDescriptor,
        generics: &[TypeHandle],
        args: &Arguments,
    ) -> Result<Value, Fault> {
        let observed = CallRecord::observed(member.name(), generics, args.values());
        let (contracts, mode) = {
            let mut state = self.state.borrow_mut();
            if let Some(recording) = state.recording.as_mut() {
                recording.push(observed);
                drop(state);
                return Ok(self.default_return(member));
            }
            if state.trace_calls {
                debug!(dispatcher = %self.id, call = %observed, "dispatch");
            } else {
                trace!(dispatcher = %self.id, call = %observed, "dispatch");
            }
            state.log.push(observed.clone());
            (state.contracts.clone(), state.mode)
        };

        let Some(contract) = contracts
            .iter()
            .rev()
            .find(|contract| contract.pattern.matches(&observed, &*self.comparer))
        else {
            return match mode {
                FakeMode::Lenient => Ok(self.default_return(member)),
                FakeMode::Strict => {
                    let patterns = contracts.iter().rev().map(|c| c.pattern.clone()).collect();
                    let unmatched = UnmatchedCall::new(observed, patterns, self.calls());
                    debug!(dispatcher = %self.id, call = %unmatched.call, "unmatched call");
                    Err(unmatched.into())
                }
            };
        };

        let result = match contract.behavior.base_type() {
            Some(base) => {
                let target = base.find_member(member).ok_or_else(|| Fault::BaseMemberMissing {
                    ty: base.name().to_owned(),
                    member: member.signature(),
                })?;
                let body = target
                    .body()
                    .filter(|_| !target.is_abstract())
                    .ok_or_else(|| Fault::BaseMemberAbstract {
                        ty: base.name().to_owned(),
                        member: member.signature(),
                    })?;
                contract.behavior.record_call();
                body(this, args)?
            }
            None => contract.behavior.invoke(args)?,
        };

        if member.returns().is_none() && !result.is_null() {
            return Err(Fault::ShapeMismatch {
                member: member.signature(),
                value: result.to_string(),
            });
        }
        Ok(result)
    }

    /// Check how often calls matching `pattern` (or any call) happened.
    ///
    /// # Errors
    /// [`Fault::Verification`] when the count is outside `times`.
    pub fn verify(&self, times: Times, pattern: Option<&CallRecord>) -> Result<(), Fault> {
        let log = self.calls();
        let matching = match pattern {
            Some(pattern) => log.matching(pattern, &*self.comparer),
            None => log.clone(),
        };
        if times.is_in_range(matching.len()) {
            return Ok(());
        }
        let failure =
            VerificationFailure::new(times, matching.len(), pattern.cloned(), matching, log);
        debug!(dispatcher = %self.id, expected = %times, actual = failure.actual, "verification failed");
        Err(failure.into())
    }

    /// Check every contract against its own range and, optionally, the total
    /// number of calls against `total`.
    ///
    /// # Errors
    /// [`Fault::Contracts`] listing every violation.
    pub fn verify_all(&self, total: Option<Times>) -> Result<(), Fault> {
        let violations: Vec<ContractViolation> = self
            .contracts()
            .iter()
            .filter(|contract| !contract.behavior.has_expected_calls())
            .map(|contract| ContractViolation {
                pattern: contract.pattern.clone(),
                expected: contract.behavior.times(),
                actual: contract.behavior.calls(),
            })
            .collect();
        let log = self.calls();
        let total = total
            .filter(|times| !times.is_in_range(log.len()))
            .map(|times| (times, log.len()));
        if violations.is_empty() && total.is_none() {
            return Ok(());
        }
        debug!(dispatcher = %self.id, violations = violations.len(), "contracts not satisfied");
        Err(ContractViolations::new(violations, total, log).into())
    }

    /// Snapshot of the call log.
    pub fn calls(&self) -> CallLog {
        self.state.borrow().log.clone()
    }

    /// Registered contracts, in registration order.
    pub fn contracts(&self) -> Vec<Arc<Contract>> {
        self.state.borrow().contracts.clone()
    }

    /// Registered patterns, most recent first.
    pub fn patterns(&self) -> Vec<CallRecord> {
        self.state
            .borrow()
            .contracts
            .iter()
            .rev()
            .map(|contract| contract.pattern.clone())
            .collect()
    }

    /// Forget every contract and every observed call.
    pub fn reset(&self) {
        let mut state = self.state.borrow_mut();
        state.contracts.clear();
        state.log.clear();
    }

    /// Whether calls are currently being recorded for a setup statement.
    pub fn is_recording(&self) -> bool {
        self.state.borrow().recording.is_some()
    }

    pub(crate) fn begin_recording(&self) {
        self.state.borrow_mut().recording = Some(Vec::new());
    }

    pub(crate) fn end_recording(&self) -> Vec<CallRecord> {
        self.state.borrow_mut().recording.take().unwrap_or_default()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Dispatcher")
            .field("id", &self.id)
            .field("mode", &state.mode)
            .field("contracts", &state.contracts.len())
            .field("calls", &state.log.len())
            .finish_non_exhaustive()
    }
}
