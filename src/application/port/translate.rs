// SPDX-License-Identifier: MPL-2.0
//! Instruction translation port definition.
//!
//! Generation models follow English prompts far better than other
//! languages, so user instructions pass through a [`Translator`] before
//! prompt assembly.
//!
//! # Design Notes
//!
//! - Translation is best-effort by contract: implementations fall back to
//!   the original text on any failure, so the method is infallible
//! - Returns [`BoxFuture`] so the trait stays object-safe

use futures_util::future::BoxFuture;

/// Port for translating edit instructions to English.
pub trait Translator: Send + Sync {
    /// Translates `text` to English, returning the input unchanged when
    /// translation is unavailable or fails.
    fn translate_to_english<'a>(&'a self, text: &'a str) -> BoxFuture<'a, String>;
}
