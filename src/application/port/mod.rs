// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters implement.
//! These traits use only domain types, ensuring the application layer remains
//! independent of concrete implementations.
//!
//! # Available Ports
//!
//! - [`provider`]: remote AI image generation (inpaint, background removal,
//!   text-to-image)
//! - [`translate`]: best-effort instruction translation
//!
//! # Design Notes
//!
//! - All traits use domain types only (no HTTP clients, no wire DTOs)
//! - Traits are `Send + Sync` and object-safe, held behind `Arc<dyn _>`
//! - Async methods return `BoxFuture` rather than `async fn` so trait
//!   objects keep working

pub mod provider;
pub mod translate;

// Re-export main types for convenience
pub use provider::{GenerationParams, ImageProvider, ProviderError, ProviderResult};
pub use translate::Translator;
