// SPDX-License-Identifier: MPL-2.0
//! Raster processing for the edit pipeline.
//!
//! This module covers everything between pointer input and provider
//! payloads: rasterizing selections into masks, normalizing uploads,
//! converting between raw buffers and encoded transports, and blending
//! provider output back onto the working image.

pub mod blur;
pub mod codec;
pub mod composite;
pub mod mask;
pub mod upload;

// Re-export commonly used types
pub use composite::{CompositeOptions, ShadowParams};
pub use mask::{MaskError, MaskOptions};
pub use upload::{load_image, prepare_image};
