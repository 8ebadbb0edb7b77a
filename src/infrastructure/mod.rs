// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! This module contains concrete implementations of the port traits defined in
//! `application::port`. These adapters wrap the external HTTP services the
//! pipeline talks to.
//!
//! # Available Adapters
//!
//! - [`runware`]: task-envelope generation API (implements [`ImageProvider`])
//! - [`translate`]: best-effort instruction translation (implements
//!   [`Translator`])
//!
//! # Design Notes
//!
//! - Adapters implement traits from `application::port`
//! - Wire DTOs stay private to their adapter module
//! - One shared HTTP client is built at startup and cloned into adapters
//!
//! [`ImageProvider`]: crate::application::port::ImageProvider
//! [`Translator`]: crate::application::port::Translator

pub mod runware;
pub mod translate;

// Re-export main types for convenience
pub use runware::RunwareClient;
pub use translate::HttpTranslator;

use crate::application::port::{ProviderError, ProviderResult};

/// Builds the HTTP client shared by all adapters.
///
/// # Errors
///
/// Returns [`ProviderError::Request`] when the TLS backend cannot be
/// initialized.
pub fn build_http_client() -> ProviderResult<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(10))
        .user_agent(concat!("lasso-patch/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|err| ProviderError::Request(err.to_string()))
}
