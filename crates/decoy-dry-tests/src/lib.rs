// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared fixtures, generated fakes and assertion helpers for Decoy tests.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`fixtures`] - Canonical type descriptors (interfaces, base classes, invalid types)
//! - [`doubles`] - Rust traits with `fake!`-generated doubles
//! - [`assertions`] - Helpers that unwrap engine failures into their diagnostics

pub mod assertions;
pub mod doubles;
pub mod fixtures;

// Re-export commonly used items at crate root for convenience
pub use assertions::{expect_unmatched, expect_verification, expect_violations, log_lines, panic_message};
pub use doubles::{Calculator, Clock, FakeCalculator, FakeClock};
pub use fixtures::{calculator, named, shape, strict_calculator};
