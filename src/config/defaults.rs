// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the application. Constants are organized by category.
//!
//! # Categories
//!
//! - **Provider**: Generation endpoint, models and inference tuning
//! - **Edit**: Mask and compositing defaults
//! - **Translate**: Instruction translation endpoint
//! - **Upload**: Dimension normalization for incoming images

// ==========================================================================
// Provider Defaults
// ==========================================================================

/// Default generation API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.runware.ai/v1/image/inference";

/// Default model for text-to-image generation.
pub const DEFAULT_MODEL: &str = "bfl:2@2";

/// Default model for masked inpainting. The text model cannot fill
/// masks, so inpainting swaps to this one unless the configuration pins
/// another.
pub const DEFAULT_INPAINT_MODEL: &str = "runware:102@1";

/// Default diffusion step count.
pub const DEFAULT_STEPS: u32 = 20;

/// Minimum diffusion step count.
pub const MIN_STEPS: u32 = 1;

/// Maximum diffusion step count accepted by the backends.
pub const MAX_STEPS: u32 = 100;

/// Default classifier-free guidance scale.
pub const DEFAULT_CFG_SCALE: f32 = 7.0;

/// Default negative prompt sent with every non-strict inference.
pub const DEFAULT_NEGATIVE_PROMPT: &str =
    "blurry, low quality, distorted, ugly, bad anatomy, watermark, text, logo";

/// Environment variable consulted when the configured API key is empty.
pub const API_KEY_ENV_VAR: &str = "RUNWARE_API_KEY";

// ==========================================================================
// Edit Defaults
// ==========================================================================

/// Default generation strength for inpainting.
pub const DEFAULT_STRENGTH: f32 = 0.75;

/// Default mask stroke dilation in pixels.
pub const DEFAULT_DILATION: f32 = 25.0;

/// Default mask feather radius in pixels (hard edges).
pub const DEFAULT_FEATHER: u32 = 0;

// ==========================================================================
// Translate Defaults
// ==========================================================================

/// Default translation endpoint.
pub const DEFAULT_TRANSLATE_ENDPOINT: &str =
    "https://translate.googleapis.com/translate_a/single";

// ==========================================================================
// Upload Defaults
// ==========================================================================

/// Default maximum dimension for normalized uploads, in pixels.
pub const DEFAULT_MAX_DIMENSION: u32 = 1024;

/// Minimum accepted maximum dimension. Anything smaller collapses every
/// upload onto the 128-pixel floor.
pub const MIN_MAX_DIMENSION: u32 = 128;

/// Maximum accepted maximum dimension.
pub const MAX_MAX_DIMENSION: u32 = 4096;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Provider validation
    assert!(MIN_STEPS > 0);
    assert!(MAX_STEPS >= MIN_STEPS);
    assert!(DEFAULT_STEPS >= MIN_STEPS);
    assert!(DEFAULT_STEPS <= MAX_STEPS);
    assert!(DEFAULT_CFG_SCALE > 0.0);

    // Edit validation
    assert!(DEFAULT_STRENGTH >= 0.0);
    assert!(DEFAULT_STRENGTH <= 1.0);
    assert!(DEFAULT_DILATION >= 0.0);

    // Upload validation
    assert!(MIN_MAX_DIMENSION > 0);
    assert!(MAX_MAX_DIMENSION >= MIN_MAX_DIMENSION);
    assert!(DEFAULT_MAX_DIMENSION >= MIN_MAX_DIMENSION);
    assert!(DEFAULT_MAX_DIMENSION <= MAX_MAX_DIMENSION);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_defaults_are_valid() {
        assert_eq!(DEFAULT_STEPS, 20);
        assert!(DEFAULT_STEPS >= MIN_STEPS);
        assert!(DEFAULT_STEPS <= MAX_STEPS);
        assert!(DEFAULT_ENDPOINT.starts_with("https://"));
    }

    #[test]
    fn inpaint_model_differs_from_text_model() {
        assert_ne!(DEFAULT_MODEL, DEFAULT_INPAINT_MODEL);
    }

    #[test]
    fn edit_defaults_are_valid() {
        assert!((DEFAULT_STRENGTH - 0.75).abs() < f32::EPSILON);
        assert!((DEFAULT_DILATION - 25.0).abs() < f32::EPSILON);
        assert_eq!(DEFAULT_FEATHER, 0);
    }

    #[test]
    fn upload_defaults_are_valid() {
        assert_eq!(DEFAULT_MAX_DIMENSION, 1024);
        assert!(DEFAULT_MAX_DIMENSION >= MIN_MAX_DIMENSION);
        assert!(DEFAULT_MAX_DIMENSION <= MAX_MAX_DIMENSION);
        // The floor matches the provider's smallest accepted side.
        assert_eq!(MIN_MAX_DIMENSION, crate::media::upload::MIN_DIMENSION);
    }
}
