// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Helpers that unwrap engine failures into their diagnostics.
//!
//! Each `expect_*` helper panics with the actual outcome when the result is
//! not the expected failure, so test bodies stay one line per assertion.

use decoy_core::{CallLog, ContractViolations, Fault, UnmatchedCall, Value, VerificationFailure};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Unwrap a strict-mode miss.
///
/// # Panics
/// When `result` is not [`Fault::Unmatched`].
#[allow(clippy::panic)]
pub fn expect_unmatched(result: Result<Value, Fault>) -> UnmatchedCall {
    match result {
        Err(Fault::Unmatched(unmatched)) => unmatched,
        other => panic!("expected an unmatched call, got {other:?}"),
    }
}

/// Unwrap a count mismatch.
///
/// # Panics
/// When `result` is not [`Fault::Verification`].
#[allow(clippy::panic)]
pub fn expect_verification(result: Result<(), Fault>) -> VerificationFailure {
    match result {
        Err(Fault::Verification(failure)) => failure,
        other => panic!("expected a verification failure, got {other:?}"),
    }
}

/// Unwrap a batch of contract violations.
///
/// # Panics
/// When `result` is not [`Fault::Contracts`].
#[allow(clippy::panic)]
pub fn expect_violations(result: Result<(), Fault>) -> ContractViolations {
    match result {
        Err(Fault::Contracts(violations)) => violations,
        other => panic!("expected contract violations, got {other:?}"),
    }
}

/// Run `f`, returning its panic message if it panicked.
pub fn panic_message<F: FnOnce()>(f: F) -> Option<String> {
    catch_unwind(AssertUnwindSafe(f)).err().map(|payload| describe(&*payload))
}

fn describe(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else {
        String::from("<non-string panic payload>")
    }
}

/// Render each record of `log` on its own line.
pub fn log_lines(log: &CallLog) -> Vec<String> {
    log.iter().map(ToString::to_string).collect()
}
