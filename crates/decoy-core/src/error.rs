// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error taxonomy.
//!
//! Configuration errors ([`SynthesisError`], [`SetupError`]) are permanent.
//! Call-contract errors ([`UnmatchedCall`]) are the expected outcome of strict
//! testing. Verification errors ([`VerificationFailure`],
//! [`ContractViolations`]) carry expected/actual counts and the call log. All
//! of them are plain data.

use crate::call::{CallLog, CallRecord};
use crate::times::Times;
use std::error::Error;
use std::fmt::Write as _;
use std::sync::Arc;
use thiserror::Error;

/// Invalid synthesis request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    /// Parent cannot be inherited from (sealed class or value type).
    #[error("cannot fake sealed type {ty}")]
    Sealed {
        /// Offending type.
        ty: String,
    },
    /// Pointer types are never fakeable.
    #[error("cannot fake pointer type {ty}")]
    Pointer {
        /// Offending type.
        ty: String,
    },
    /// Type still has unbound generic parameters.
    #[error("cannot fake open generic type {ty}")]
    OpenGeneric {
        /// Offending type.
        ty: String,
    },
    /// Type is neither public nor internal with a grant to fakes.
    #[error("type {ty} is not visible to fakes")]
    NotVisible {
        /// Offending type.
        ty: String,
    },
    /// Entry in the interface list is not an interface.
    #[error("{ty} is not an interface")]
    NotAnInterface {
        /// Offending type.
        ty: String,
    },
}

/// A setup or verify statement could not be compiled into a call pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// The statement did not call any member of the fake.
    #[error("setup statement did not call the fake")]
    NoCallRecorded,
    /// The statement called the fake more than once.
    #[error("setup statement must call the fake exactly once, but called it {0} times")]
    MultipleCallsRecorded(usize),
    /// Matchers were created but not used as arguments of the recorded call.
    #[error("{0} argument matcher(s) were not used in the recorded call")]
    UnusedMatchers(usize),
    /// Literal arguments collide with matcher placeholders, so the matchers
    /// cannot be bound to positions.
    #[error("{arguments} argument(s) look like the {matchers} queued matcher placeholder(s); pass an explicit matcher instead of the colliding literal")]
    AmbiguousPlaceholder {
        /// Matchers queued by the statement.
        matchers: usize,
        /// Recorded arguments equal to a queued placeholder.
        arguments: usize,
    },
}

/// Configuration could not be loaded.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Malformed JSON or unknown field.
    #[error("invalid fake settings: {0}")]
    Parse(#[from] serde_json::Error),
}

fn render_section(out: &mut String, title: &str, records: &[CallRecord]) {
    let _ = write!(out, "\n{title}:");
    if records.is_empty() {
        out.push_str("\n  (none)");
    }
    for record in records {
        let _ = write!(out, "\n  {record}");
    }
}

/// A strict fake received a call no contract matches.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct UnmatchedCall {
    /// Human-readable diagnostic.
    pub message: String,
    /// The observed call.
    pub call: CallRecord,
    /// Every registered pattern, most recent first.
    pub patterns: Vec<CallRecord>,
    /// Full call log, including `call`.
    pub log: CallLog,
}

impl UnmatchedCall {
    /// Build the diagnostic.
    pub fn new(call: CallRecord, patterns: Vec<CallRecord>, log: CallLog) -> Self {
        let mut message = format!("unmatched call {call}");
        render_section(&mut message, "registered patterns", &patterns);
        render_section(&mut message, "call log", log.records());
        Self {
            message,
            call,
            patterns,
            log,
        }
    }
}

/// Observed call count outside the expected range.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct VerificationFailure {
    /// Human-readable diagnostic.
    pub message: String,
    /// Expected range.
    pub expected: Times,
    /// Observed count.
    pub actual: usize,
    /// Pattern that was counted; `None` counts every call.
    pub pattern: Option<CallRecord>,
    /// Calls that matched `pattern`.
    pub matching: CallLog,
    /// Full call log.
    pub log: CallLog,
}

impl VerificationFailure {
    /// Build the diagnostic.
    pub fn new(
        expected: Times,
        actual: usize,
        pattern: Option<CallRecord>,
        matching: CallLog,
        log: CallLog,
    ) -> Self {
        let subject = pattern
            .as_ref()
            .map_or_else(|| String::from("the fake"), ToString::to_string);
        let mut message = format!(
            "expected {subject} to be called {expected}, but it was called {actual} {}",
            if actual == 1 { "time" } else { "times" }
        );
        render_section(&mut message, "matching calls", matching.records());
        render_section(&mut message, "call log", log.records());
        Self {
            message,
            expected,
            actual,
            pattern,
            matching,
            log,
        }
    }
}

/// One contract whose own count is outside its own range.
#[derive(Debug, Clone)]
pub struct ContractViolation {
    /// Contract pattern.
    pub pattern: CallRecord,
    /// Range the contract was configured with.
    pub expected: Times,
    /// Calls the contract received.
    pub actual: usize,
}

/// Aggregated `verify_all` failure.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ContractViolations {
    /// Human-readable diagnostic.
    pub message: String,
    /// One entry per violating contract.
    pub violations: Vec<ContractViolation>,
    /// Expected and actual total call count, when the total was out of range.
    pub total: Option<(Times, usize)>,
    /// Full call log.
    pub log: CallLog,
}

impl ContractViolations {
    /// Build the diagnostic.
    pub fn new(
        violations: Vec<ContractViolation>,
        total: Option<(Times, usize)>,
        log: CallLog,
    ) -> Self {
        let mut message = String::from("call contracts were not satisfied:");
        for violation in &violations {
            let _ = write!(
                message,
                "\n  {}: expected {}, actual {}",
                violation.pattern, violation.expected, violation.actual
            );
        }
        if let Some((expected, actual)) = total {
            let _ = write!(message, "\n  total calls: expected {expected}, actual {actual}");
        }
        render_section(&mut message, "call log", log.records());
        Self {
            message,
            violations,
            total,
            log,
        }
    }
}

/// Engine error.
#[derive(Debug, Clone, Error)]
pub enum Fault {
    /// Invalid synthesis request.
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
    /// Setup/verify statement could not be compiled.
    #[error(transparent)]
    Setup(#[from] SetupError),
    /// Strict fake received an unmatched call.
    #[error(transparent)]
    Unmatched(#[from] UnmatchedCall),
    /// `verify` failed.
    #[error(transparent)]
    Verification(#[from] VerificationFailure),
    /// `verify_all` failed.
    #[error(transparent)]
    Contracts(#[from] ContractViolations),
    /// The synthesized type has no override that fits the call.
    #[error("{ty} has no overridable member {member} matching the call")]
    MissingMember {
        /// Synthesized type name.
        ty: String,
        /// Requested member.
        member: String,
    },
    /// Call-base target type does not declare the member.
    #[error("base type {ty} does not declare {member}")]
    BaseMemberMissing {
        /// Requested base type.
        ty: String,
        /// Member signature.
        member: String,
    },
    /// Call-base target has no implementation.
    #[error("base member {ty}::{member} is abstract")]
    BaseMemberAbstract {
        /// Requested base type.
        ty: String,
        /// Member signature.
        member: String,
    },
    /// A void member's behavior produced a value.
    #[error("void member {member} returned {value}")]
    ShapeMismatch {
        /// Member signature.
        member: String,
        /// Rendered value.
        value: String,
    },
    /// Behavior result cannot be cast to the declared return type.
    #[error("member {member} returns {expected}, but the behavior produced {actual}")]
    ReturnTypeMismatch {
        /// Member signature.
        member: String,
        /// Declared type.
        expected: String,
        /// Produced type.
        actual: String,
    },
    /// Argument has an unexpected type.
    #[error("argument {index} is not a {expected} (got {actual})")]
    ArgumentType {
        /// Positional index.
        index: usize,
        /// Requested type.
        expected: &'static str,
        /// Actual type, or `'null'`.
        actual: String,
    },
    /// A behavior body failed; the original error is preserved.
    #[error(transparent)]
    Raised(Arc<dyn Error + Send + Sync>),
}

impl Fault {
    /// Wrap a body's own failure.
    pub fn raise<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::Raised(Arc::new(error))
    }

    /// The body's own failure, if this is one.
    pub fn raised(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        match self {
            Self::Raised(error) => Some(&**error),
            _ => None,
        }
    }

    /// The body's own failure as `E`.
    pub fn downcast_raised<E: Error + 'static>(&self) -> Option<&E> {
        self.raised()?.downcast_ref::<E>()
    }

    /// Offending call record, when the failure has one.
    pub fn call(&self) -> Option<&CallRecord> {
        match self {
            Self::Unmatched(unmatched) => Some(&unmatched.call),
            Self::Verification(failure) => failure.pattern.as_ref(),
            _ => None,
        }
    }

    /// Full call log, when the failure carries one.
    pub fn call_log(&self) -> Option<&CallLog> {
        match self {
            Self::Unmatched(unmatched) => Some(&unmatched.log),
            Self::Verification(failure) => Some(&failure.log),
            Self::Contracts(violations) => Some(&violations.log),
            _ => None,
        }
    }

    /// Whether this is a call-contract error.
    pub const fn is_unmatched(&self) -> bool {
        matches!(self, Self::Unmatched(_))
    }

    /// Whether this is a verification error.
    pub const fn is_verification(&self) -> bool {
        matches!(self, Self::Verification(_) | Self::Contracts(_))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[derive(Debug, thiserror::Error, PartialEq)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn raised_errors_keep_identity() {
        let fault = Fault::raise(Boom);
        assert_eq!(fault.to_string(), "boom");
        assert_eq!(fault.downcast_raised::<Boom>(), Some(&Boom));
        assert!(fault.clone().downcast_raised::<Boom>().is_some());
    }

    #[test]
    fn unmatched_message_lists_patterns_and_log() {
        let call = CallRecord::observed("calc", &[], &[Value::of(3_i32)]);
        let log = CallLog::from(vec![call.clone()]);
        let unmatched = UnmatchedCall::new(call, Vec::new(), log);
        assert_eq!(
            unmatched.message,
            "unmatched call calc(3)\nregistered patterns:\n  (none)\ncall log:\n  calc(3)"
        );
    }

    #[test]
    fn verification_message_names_counts() {
        let call = CallRecord::observed("calc", &[], &[Value::of(3_i32)]);
        let failure = VerificationFailure::new(
            Times::never(),
            1,
            Some(call.clone()),
            CallLog::from(vec![call.clone()]),
            CallLog::from(vec![call]),
        );
        assert!(failure
            .message
            .starts_with("expected calc(3) to be called exactly 0 times, but it was called 1 time"));
        let fault = Fault::from(failure);
        assert!(fault.is_verification());
        assert_eq!(fault.call_log().map(CallLog::len), Some(1));
    }
}
