// SPDX-License-Identifier: MPL-2.0
//! Error handling for Lasso Patch.
//!
//! Defines the crate-wide [`Error`] enum and [`Result`] alias used by the
//! binary and the library surface. Subsystems with richer failure taxonomies
//! (editing, providers, sessions) define their own enums and convert into
//! [`Error`] at the boundary.

use crate::application::edit::EditError;
use std::fmt;

/// Top-level error type for the crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// I/O failure while reading or writing files.
    Io(String),
    /// Raster decode, encode or resample failure.
    Image(String),
    /// Configuration load or save failure.
    Config(String),
    /// Malformed input data, such as a selection file that is not valid JSON.
    Parse(String),
    /// Failure raised by the edit pipeline.
    Edit(EditError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(msg) => write!(f, "I/O Error: {msg}"),
            Error::Image(msg) => write!(f, "Image Error: {msg}"),
            Error::Config(msg) => write!(f, "Configuration Error: {msg}"),
            Error::Parse(msg) => write!(f, "Parse Error: {msg}"),
            Error::Edit(err) => write!(f, "Edit Error: {err}"),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<EditError> for Error {
    fn from(err: EditError) -> Self {
        Error::Edit(err)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
