// SPDX-License-Identifier: MPL-2.0
//! Shared test helpers.
//!
//! Re-exports the `approx` crate's assertion macros so tests comparing
//! strengths, mask weights and color-match factors tolerate floating-point
//! rounding that `assert_eq!` would reject.

pub use approx::{assert_abs_diff_eq, assert_abs_diff_ne, assert_relative_eq, assert_relative_ne};
