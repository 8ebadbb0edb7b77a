// SPDX-License-Identifier: MPL-2.0
//! Image intake and dimension normalization.
//!
//! Generation backends want modest, grid-aligned canvases. Incoming
//! images are decoded, scaled down to fit the configured maximum
//! dimension, and snapped to the provider's 64-pixel grid with a lower
//! bound of 128 pixels per side. The selection, mask and all later edits
//! operate on the normalized buffer.

use crate::domain::media::RawImage;
use crate::error::Result;
use image_rs::imageops::FilterType;
use std::fs;
use std::path::Path;

/// Providers accept dimensions in multiples of this.
pub const DIMENSION_STEP: u32 = 64;
/// Smallest side length ever submitted.
pub const MIN_DIMENSION: u32 = 128;

/// Scales dimensions down to fit `max_dimension` and snaps them onto the
/// provider grid.
///
/// Upscaling never happens; small images only get snapped. Snapping
/// truncates toward zero, then clamps to [`MIN_DIMENSION`].
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)] // Dimensions fit f64 exactly and the scale keeps them positive.
#[must_use]
pub fn normalize_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let mut scaled_width = f64::from(width);
    let mut scaled_height = f64::from(height);

    if width > max_dimension || height > max_dimension {
        let scale = (f64::from(max_dimension) / scaled_width)
            .min(f64::from(max_dimension) / scaled_height);
        scaled_width = (scaled_width * scale).round();
        scaled_height = (scaled_height * scale).round();
    }

    let snapped_width = ((scaled_width as u32) / DIMENSION_STEP) * DIMENSION_STEP;
    let snapped_height = ((scaled_height as u32) / DIMENSION_STEP) * DIMENSION_STEP;

    (
        snapped_width.max(MIN_DIMENSION),
        snapped_height.max(MIN_DIMENSION),
    )
}

/// Decodes encoded image bytes and normalizes them for a session.
///
/// # Errors
///
/// Returns [`Error::Image`](crate::error::Error::Image) when the bytes
/// don't decode as a supported format.
pub fn prepare_image(bytes: &[u8], max_dimension: u32) -> Result<RawImage> {
    let decoded = image_rs::load_from_memory(bytes)?;
    let (target_width, target_height) =
        normalize_dimensions(decoded.width(), decoded.height(), max_dimension);

    let resized = if (decoded.width(), decoded.height()) == (target_width, target_height) {
        decoded
    } else {
        decoded.resize_exact(target_width, target_height, FilterType::Lanczos3)
    };

    let rgba = resized.to_rgba8();
    Ok(RawImage::from_rgba(
        target_width,
        target_height,
        rgba.into_raw(),
    ))
}

/// Loads an image from disk and normalizes it for a session.
///
/// # Errors
///
/// Returns an error when the file can't be read or decoded.
pub fn load_image(path: &Path, max_dimension: u32) -> Result<RawImage> {
    let bytes = fs::read(path)?;
    prepare_image(&bytes, max_dimension)
}
