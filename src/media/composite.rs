// SPDX-License-Identifier: MPL-2.0
//! Mask-weighted compositing of provider output onto the working image.
//!
//! Provider results come back as full frames; this module blends them onto
//! the original so only masked pixels change:
//! - optional contact-shadow synthesis beneath the selection
//! - optional color matching of the patch against its surroundings
//! - per-pixel blend weighted by mask intensity, edited alpha and a
//!   global opacity
//!
//! Pixels whose blend weight works out to zero keep their original bytes
//! exactly, so an untouched area survives any number of edits unchanged.

use crate::domain::editing::CorrectionFactor;
use crate::domain::media::{Mask, RawImage};
use crate::media::blur;

/// Mask intensities below this sample the original as background.
const BACKGROUND_MASK_CEILING: u8 = 32;
/// Mask intensities above this sample the edited frame as foreground.
const FOREGROUND_MASK_FLOOR: u8 = 223;
/// Color matching needs at least this many samples on each side.
const MIN_SAMPLE_COUNT: usize = 8;

/// Rec. 709 luminance weights.
const LUMA_RED: f64 = 0.2126;
const LUMA_GREEN: f64 = 0.7152;
const LUMA_BLUE: f64 = 0.0722;

/// Clamp range for the luminance scale, so a mismatched exposure never
/// turns the patch into a silhouette or a flare.
const LUMINANCE_SCALE_MIN: f64 = 0.75;
const LUMINANCE_SCALE_MAX: f64 = 1.25;

// ============================================================================
// Options
// ============================================================================

/// Contact-shadow parameters.
///
/// The mask silhouette is squashed toward the selection's bottom edge,
/// dropped slightly, blurred and multiplied under the patch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowParams {
    /// Vertical squash factor applied about the selection bottom.
    pub squash: f32,
    /// Downward offset as a fraction of the selection height.
    pub drop: f32,
    /// Blur radius in pixels applied to the silhouette.
    pub blur: u32,
    /// Peak darkening opacity.
    pub opacity: f32,
}

impl Default for ShadowParams {
    fn default() -> Self {
        Self {
            squash: 0.35,
            drop: 0.15,
            blur: 8,
            opacity: 0.45,
        }
    }
}

/// Compositing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeOptions {
    /// Global blend opacity in `0.0..=1.0`.
    pub opacity: f32,
    /// Matches patch colors against the surrounding original.
    pub color_match: bool,
    /// Fraction of the measured color offset applied.
    pub correction: CorrectionFactor,
    /// Synthesizes a contact shadow beneath the selection when set.
    pub shadow: Option<ShadowParams>,
}

impl Default for CompositeOptions {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            color_match: true,
            correction: CorrectionFactor::default(),
            shadow: None,
        }
    }
}

// ============================================================================
// Color matching
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct ColorMatch {
    /// Per-channel offset nudging the patch toward the surroundings.
    offset: [f32; 3],
    /// Multiplicative luminance correction.
    scale: f32,
}

/// Measures how far the edited foreground sits from the original
/// background, or `None` when either side has too few samples.
fn color_match_params(
    original: &[u8],
    edited: &[u8],
    mask: &[u8],
    correction: CorrectionFactor,
) -> Option<ColorMatch> {
    let mut background_sum = [0.0f64; 3];
    let mut background_count = 0usize;
    let mut foreground_sum = [0.0f64; 3];
    let mut foreground_count = 0usize;

    for (index, &intensity) in mask.iter().enumerate() {
        let offset = index * 4;
        if intensity < BACKGROUND_MASK_CEILING {
            for channel in 0..3 {
                background_sum[channel] += f64::from(original[offset + channel]);
            }
            background_count += 1;
        } else if intensity > FOREGROUND_MASK_FLOOR {
            for channel in 0..3 {
                foreground_sum[channel] += f64::from(edited[offset + channel]);
            }
            foreground_count += 1;
        }
    }

    if background_count < MIN_SAMPLE_COUNT || foreground_count < MIN_SAMPLE_COUNT {
        return None;
    }

    let mut offset = [0.0f32; 3];
    let mut background_mean = [0.0f64; 3];
    let mut foreground_mean = [0.0f64; 3];
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    for channel in 0..3 {
        background_mean[channel] = background_sum[channel] / background_count as f64;
        foreground_mean[channel] = foreground_sum[channel] / foreground_count as f64;
        offset[channel] =
            ((background_mean[channel] - foreground_mean[channel]) * f64::from(correction.value()))
                as f32;
    }

    let background_luma = LUMA_RED * background_mean[0]
        + LUMA_GREEN * background_mean[1]
        + LUMA_BLUE * background_mean[2];
    let foreground_luma = LUMA_RED * foreground_mean[0]
        + LUMA_GREEN * foreground_mean[1]
        + LUMA_BLUE * foreground_mean[2];

    let scale = if foreground_luma <= f64::EPSILON {
        1.0
    } else {
        (background_luma / foreground_luma).clamp(LUMINANCE_SCALE_MIN, LUMINANCE_SCALE_MAX)
    };

    #[allow(clippy::cast_possible_truncation)]
    Some(ColorMatch {
        offset,
        scale: scale as f32,
    })
}

// ============================================================================
// Shadow synthesis
// ============================================================================

/// Draws a squashed, blurred copy of the mask silhouette beneath the
/// selection by multiplying the base toward black.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)] // Pixel coordinates and intensities fit comfortably in f32.
fn synthesize_shadow(base: &mut [u8], mask: &Mask, params: &ShadowParams) {
    let Some(bounds) = mask.bounding_box() else {
        return;
    };
    if params.squash <= 0.0 || params.opacity <= 0.0 {
        return;
    }

    let width = mask.width() as usize;
    let height = mask.height() as usize;
    let bottom = bounds.max_y;
    let drop_px = bounds.height() * params.drop;

    // Inverse-map each target row back into the silhouette: the band
    // [bottom + drop - squash * bbox height, bottom + drop] picks up the
    // squashed mask, everything else stays empty.
    let mut silhouette = vec![0u8; width * height];
    for target_y in 0..height {
        let source_y = bottom + ((target_y as f32) - bottom - drop_px) / params.squash;
        let source_y = source_y.round();
        if source_y < 0.0 || source_y >= height as f32 {
            continue;
        }
        let source_row = source_y as usize;
        silhouette[target_y * width..][..width]
            .copy_from_slice(&mask.data()[source_row * width..][..width]);
    }

    blur::box_blur(&mut silhouette, width, height, params.blur as usize);

    let opacity = params.opacity.clamp(0.0, 1.0);
    for (index, &intensity) in silhouette.iter().enumerate() {
        if intensity == 0 {
            continue;
        }
        let factor = 1.0 - opacity * (f32::from(intensity) / 255.0);
        let offset = index * 4;
        for channel in 0..3 {
            base[offset + channel] = (f32::from(base[offset + channel]) * factor).round() as u8;
        }
    }
}

// ============================================================================
// Compositing
// ============================================================================

/// Blends an edited frame onto the original, weighted by the mask.
///
/// The output keeps the original's alpha channel; the edited frame's
/// alpha only scales how strongly its colors blend in. Pixels with an
/// effective weight of zero keep their original bytes exactly.
///
/// # Panics
///
/// Panics if the three buffers disagree on dimensions. Callers resample
/// provider output to the working size first.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
// Blend results are clamped into byte range before the cast.
#[must_use]
pub fn composite_edit(
    original: &RawImage,
    edited: &RawImage,
    mask: &Mask,
    options: &CompositeOptions,
) -> RawImage {
    assert_eq!(
        (original.width(), original.height()),
        (edited.width(), edited.height()),
        "edited frame dimensions must match the original"
    );
    assert_eq!(
        (original.width(), original.height()),
        (mask.width(), mask.height()),
        "mask dimensions must match the original"
    );

    let mut output = original.rgba_bytes().to_vec();

    if let Some(shadow) = &options.shadow {
        synthesize_shadow(&mut output, mask, shadow);
    }

    let edited_bytes = edited.rgba_bytes();
    let mask_data = mask.data();
    let match_params = if options.color_match {
        color_match_params(
            original.rgba_bytes(),
            edited_bytes,
            mask_data,
            options.correction,
        )
    } else {
        None
    };

    let opacity = options.opacity.clamp(0.0, 1.0);
    for (index, &intensity) in mask_data.iter().enumerate() {
        let offset = index * 4;
        let mask_weight = f32::from(intensity) / 255.0;
        let edited_alpha = f32::from(edited_bytes[offset + 3]) / 255.0;
        let effective = mask_weight * edited_alpha * opacity;
        if effective <= 0.0 {
            continue;
        }

        for channel in 0..3 {
            let edited_value = f32::from(edited_bytes[offset + channel]);
            let corrected = match &match_params {
                Some(params) => {
                    let matched = (edited_value + params.offset[channel]) * params.scale;
                    // Correction fades out with the mask so patch edges
                    // stay continuous with the surroundings.
                    edited_value + (matched - edited_value) * mask_weight
                }
                None => edited_value,
            }
            .clamp(0.0, 255.0);

            let base_value = f32::from(output[offset + channel]);
            output[offset + channel] =
                (corrected * effective + base_value * (1.0 - effective)).round() as u8;
        }
        // Alpha stays the original's.
    }

    RawImage::from_rgba(original.width(), original.height(), output)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds an image filled with one RGBA value.
    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RawImage {
        let mut bytes = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            bytes.extend_from_slice(&rgba);
        }
        RawImage::from_rgba(width, height, bytes)
    }

    fn no_match_options() -> CompositeOptions {
        CompositeOptions {
            color_match: false,
            ..CompositeOptions::default()
        }
    }

    #[test]
    fn zero_mask_keeps_original_bytes_exactly() {
        let mut bytes = Vec::new();
        for i in 0..(16 * 16 * 4) as u32 {
            bytes.push((i * 7 % 256) as u8);
        }
        let original = RawImage::from_rgba(16, 16, bytes.clone());
        let edited = solid(16, 16, [255, 0, 0, 255]);
        let mask = Mask::new(16, 16, vec![0u8; 16 * 16]);

        let result = composite_edit(&original, &edited, &mask, &CompositeOptions::default());
        assert_eq!(result.rgba_bytes(), bytes.as_slice());
    }

    #[test]
    fn full_mask_replaces_with_edited_colors() {
        let original = solid(8, 8, [128, 128, 128, 255]);
        let edited = solid(8, 8, [255, 0, 0, 255]);
        let mask = Mask::new(8, 8, vec![255u8; 64]);

        // Color matching stays enabled but finds no background samples,
        // so the patch comes through untouched.
        let result = composite_edit(&original, &edited, &mask, &CompositeOptions::default());
        for pixel in result.rgba_bytes().chunks_exact(4) {
            assert_eq!(pixel, [255, 0, 0, 255]);
        }
    }

    #[test]
    fn half_intensity_blends_midway() {
        let original = solid(4, 4, [0, 0, 0, 255]);
        let edited = solid(4, 4, [200, 200, 200, 255]);
        let mask = Mask::new(4, 4, vec![128u8; 16]);

        let result = composite_edit(&original, &edited, &mask, &no_match_options());
        // 200 * (128 / 255) = 100.4, rounded down.
        for pixel in result.rgba_bytes().chunks_exact(4) {
            assert_eq!(pixel, [100, 100, 100, 255]);
        }
    }

    #[test]
    fn edited_alpha_scales_the_blend() {
        let original = solid(4, 4, [0, 0, 0, 255]);
        let edited = solid(4, 4, [200, 200, 200, 128]);
        let mask = Mask::new(4, 4, vec![255u8; 16]);

        let result = composite_edit(&original, &edited, &mask, &no_match_options());
        for pixel in result.rgba_bytes().chunks_exact(4) {
            assert_eq!(pixel, [100, 100, 100, 255]);
        }
    }

    #[test]
    fn global_opacity_scales_the_blend() {
        let original = solid(4, 4, [0, 0, 0, 255]);
        let edited = solid(4, 4, [200, 200, 200, 255]);
        let mask = Mask::new(4, 4, vec![255u8; 16]);
        let options = CompositeOptions {
            opacity: 0.5,
            ..no_match_options()
        };

        let result = composite_edit(&original, &edited, &mask, &options);
        for pixel in result.rgba_bytes().chunks_exact(4) {
            assert_eq!(pixel, [100, 100, 100, 255]);
        }
    }

    #[test]
    fn fully_transparent_edited_pixels_change_nothing() {
        let original = solid(4, 4, [10, 20, 30, 255]);
        let edited = solid(4, 4, [200, 200, 200, 0]);
        let mask = Mask::new(4, 4, vec![255u8; 16]);

        let result = composite_edit(&original, &edited, &mask, &no_match_options());
        assert_eq!(result.rgba_bytes(), original.rgba_bytes());
    }

    #[test]
    fn output_keeps_original_alpha() {
        let original = solid(4, 4, [0, 0, 0, 77]);
        let edited = solid(4, 4, [200, 200, 200, 255]);
        let mask = Mask::new(4, 4, vec![255u8; 16]);

        let result = composite_edit(&original, &edited, &mask, &no_match_options());
        for pixel in result.rgba_bytes().chunks_exact(4) {
            assert_eq!(pixel[3], 77);
        }
    }

    #[test]
    fn color_match_pulls_patch_toward_surroundings() {
        // Left half untouched dark gray, right half a bright patch.
        let original = solid(8, 8, [50, 50, 50, 255]);
        let edited = solid(8, 8, [200, 200, 200, 255]);
        let mut mask_data = vec![0u8; 64];
        for y in 0..8 {
            for x in 4..8 {
                mask_data[y * 8 + x] = 255;
            }
        }
        let mask = Mask::new(8, 8, mask_data);

        let result = composite_edit(&original, &edited, &mask, &CompositeOptions::default());
        let bytes = result.rgba_bytes();

        // offset = (50 - 200) * 0.85 = -127.5, luminance scale clamps to
        // 0.75, so the patch lands at (200 - 127.5) * 0.75 = 54.375.
        let patch_pixel = &bytes[(3 * 8 + 6) * 4..][..4];
        assert_eq!(patch_pixel, [54, 54, 54, 255]);

        // Unmasked side keeps the original bytes.
        let background_pixel = &bytes[(3 * 8 + 1) * 4..][..4];
        assert_eq!(background_pixel, [50, 50, 50, 255]);
    }

    #[test]
    fn color_match_needs_enough_samples_on_both_sides() {
        // Mask of 255 everywhere leaves no background samples; the patch
        // must come through unshifted.
        let original = solid(8, 8, [50, 50, 50, 255]);
        let edited = solid(8, 8, [200, 200, 200, 255]);
        let mask = Mask::new(8, 8, vec![255u8; 64]);

        let result = composite_edit(&original, &edited, &mask, &CompositeOptions::default());
        assert_eq!(result.rgba_bytes()[0], 200);
    }

    #[test]
    fn intermediate_mask_values_are_excluded_from_sampling() {
        let mask_data = vec![128u8; 64];
        assert!(color_match_params(
            &vec![50u8; 64 * 4],
            &vec![200u8; 64 * 4],
            &mask_data,
            CorrectionFactor::default(),
        )
        .is_none());
    }

    #[test]
    fn shadow_darkens_below_the_selection() {
        let original = solid(32, 32, [200, 200, 200, 255]);
        let edited = solid(32, 32, [200, 200, 200, 255]);
        let mut mask_data = vec![0u8; 32 * 32];
        for y in 8..16 {
            for x in 8..16 {
                mask_data[y * 32 + x] = 255;
            }
        }
        let mask = Mask::new(32, 32, mask_data);

        let options = CompositeOptions {
            shadow: Some(ShadowParams::default()),
            ..no_match_options()
        };
        let result = composite_edit(&original, &edited, &mask, &options);

        // A row below the selection picks up the blurred shadow.
        let below = result.rgba_bytes()[(20 * 32 + 12) * 4];
        assert!(below < 200, "expected darkening, got {below}");

        // Far corner stays untouched.
        let corner = result.rgba_bytes()[(31 * 32 + 31) * 4];
        assert_eq!(corner, 200);
    }

    #[test]
    fn no_shadow_keeps_area_below_selection_untouched() {
        let original = solid(32, 32, [200, 200, 200, 255]);
        let edited = solid(32, 32, [90, 90, 90, 255]);
        let mut mask_data = vec![0u8; 32 * 32];
        for y in 8..16 {
            for x in 8..16 {
                mask_data[y * 32 + x] = 255;
            }
        }
        let mask = Mask::new(32, 32, mask_data);

        let result = composite_edit(&original, &edited, &mask, &no_match_options());
        let below = result.rgba_bytes()[(20 * 32 + 12) * 4];
        assert_eq!(below, 200);
    }

    #[test]
    #[should_panic(expected = "mask dimensions must match")]
    fn mismatched_mask_dimensions_panic() {
        let original = solid(8, 8, [0, 0, 0, 255]);
        let edited = solid(8, 8, [0, 0, 0, 255]);
        let mask = Mask::new(4, 4, vec![0u8; 16]);
        let _ = composite_edit(&original, &edited, &mask, &CompositeOptions::default());
    }
}
