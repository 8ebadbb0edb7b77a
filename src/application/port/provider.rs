// SPDX-License-Identifier: MPL-2.0
//! Image generation port definition.
//!
//! This module defines the [`ImageProvider`] trait for remote AI image
//! generation: masked inpainting, background removal and text-to-image.
//! Infrastructure adapters implement it over an HTTP API.
//!
//! # Design Notes
//!
//! - Images cross the port as [`EncodedRaster`] payloads, never as raw
//!   pixel buffers, because that is the shape remote APIs consume
//! - Methods return [`BoxFuture`] so the trait stays object-safe and can
//!   be held behind `Arc<dyn ImageProvider>`
//! - The trait is `Send + Sync` so futures can be driven from any task

use crate::domain::editing::Strength;
use crate::domain::media::EncodedRaster;
use futures_util::future::BoxFuture;
use std::fmt;

// =============================================================================
// ProviderError
// =============================================================================

/// Errors that can occur while talking to a generation provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// No API key is configured, so no request was attempted.
    Unconfigured,

    /// The request could not be sent or the connection failed.
    Request(String),

    /// The provider answered with a non-success HTTP status.
    Status {
        /// HTTP status code.
        code: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The response arrived but did not have the expected shape.
    Schema(String),

    /// A payload could not be encoded or decoded.
    Payload(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Unconfigured => write!(f, "provider API key is not configured"),
            ProviderError::Request(msg) => write!(f, "request failed: {msg}"),
            ProviderError::Status { code, body } => {
                write!(f, "provider returned status {code}: {body}")
            }
            ProviderError::Schema(msg) => write!(f, "unexpected response shape: {msg}"),
            ProviderError::Payload(msg) => write!(f, "payload error: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Result alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

// =============================================================================
// GenerationParams
// =============================================================================

/// Tuning knobs shared by the generation operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// How far the result may drift from the seed image.
    pub strength: Strength,
    /// Diffusion step count.
    pub steps: u32,
}

impl GenerationParams {
    #[must_use]
    pub fn new(width: u32, height: u32, strength: Strength, steps: u32) -> Self {
        Self {
            width,
            height,
            strength,
            steps,
        }
    }
}

// =============================================================================
// ImageProvider Trait
// =============================================================================

/// Port for remote AI image generation.
///
/// Adapters implement this over a concrete HTTP API. Callers hold the
/// provider behind `Arc<dyn ImageProvider>` and never see transport
/// details.
pub trait ImageProvider: Send + Sync {
    /// Regenerates the masked area of `image` according to `prompt`.
    ///
    /// White mask pixels are repainted, black pixels are preserved.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if:
    /// - No API key is configured
    /// - The request fails or the provider rejects it
    /// - The response cannot be interpreted
    fn inpaint<'a>(
        &'a self,
        image: &'a EncodedRaster,
        mask: &'a EncodedRaster,
        prompt: &'a str,
        params: &'a GenerationParams,
    ) -> BoxFuture<'a, ProviderResult<EncodedRaster>>;

    /// Cuts the subject out of `image`, returning it on a transparent
    /// background.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] under the same conditions as
    /// [`ImageProvider::inpaint`].
    fn remove_background<'a>(
        &'a self,
        image: &'a EncodedRaster,
    ) -> BoxFuture<'a, ProviderResult<EncodedRaster>>;

    /// Generates a fresh image from `prompt` alone.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] under the same conditions as
    /// [`ImageProvider::inpaint`].
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        params: &'a GenerationParams,
    ) -> BoxFuture<'a, ProviderResult<EncodedRaster>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_display() {
        let err = ProviderError::Unconfigured;
        assert_eq!(format!("{err}"), "provider API key is not configured");

        let err = ProviderError::Status {
            code: 429,
            body: "rate limited".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("429"));
        assert!(display.contains("rate limited"));

        let err = ProviderError::Schema("missing imageUUID".to_string());
        assert!(format!("{err}").contains("missing imageUUID"));
    }

    #[test]
    fn generation_params_carry_their_fields() {
        let params = GenerationParams::new(640, 480, Strength::new(0.5), 20);
        assert_eq!(params.width, 640);
        assert_eq!(params.height, 480);
        assert_eq!(params.steps, 20);
        assert!((params.strength.value() - 0.5).abs() < f32::EPSILON);
    }

    // Mock implementation for testing
    struct MockProvider;

    impl ImageProvider for MockProvider {
        fn inpaint<'a>(
            &'a self,
            image: &'a EncodedRaster,
            _mask: &'a EncodedRaster,
            _prompt: &'a str,
            _params: &'a GenerationParams,
        ) -> BoxFuture<'a, ProviderResult<EncodedRaster>> {
            Box::pin(async move { Ok(image.clone()) })
        }

        fn remove_background<'a>(
            &'a self,
            image: &'a EncodedRaster,
        ) -> BoxFuture<'a, ProviderResult<EncodedRaster>> {
            Box::pin(async move { Ok(image.clone()) })
        }

        fn generate<'a>(
            &'a self,
            _prompt: &'a str,
            _params: &'a GenerationParams,
        ) -> BoxFuture<'a, ProviderResult<EncodedRaster>> {
            Box::pin(async move { Err(ProviderError::Unconfigured) })
        }
    }

    #[tokio::test]
    async fn mock_provider_round_trips_through_the_trait_object() {
        let provider: std::sync::Arc<dyn ImageProvider> = std::sync::Arc::new(MockProvider);
        let raster = EncodedRaster::new("image/png", "aGVsbG8=");
        let params = GenerationParams::new(8, 8, Strength::default(), 4);

        let result = provider
            .inpaint(&raster, &raster, "a red square", &params)
            .await
            .unwrap();
        assert_eq!(result, raster);

        let err = provider.generate("anything", &params).await.unwrap_err();
        assert!(matches!(err, ProviderError::Unconfigured));
    }
}
