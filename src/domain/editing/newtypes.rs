// SPDX-License-Identifier: MPL-2.0
//! Editing newtypes.
//!
//! This module provides type-safe wrappers for edit pipeline values,
//! ensuring they are always within valid ranges:
//! - [`Strength`]: how far generation may deviate from the source image
//! - [`DilationWidth`]: stroke width used to grow the mask outline
//! - [`FeatherRadius`]: blur radius applied to soften mask edges
//! - [`CorrectionFactor`]: weighting of the color-match offset

// =============================================================================
// Strength Bounds
// =============================================================================

/// Generation strength bounds (0.0 to 1.0).
pub mod strength_bounds {
    /// Minimum strength; the source image is kept untouched.
    pub const MIN: f32 = 0.0;
    /// Maximum strength; the area is regenerated from scratch.
    pub const MAX: f32 = 1.0;
    /// Default strength for balanced edits.
    pub const DEFAULT: f32 = 0.75;
}

// =============================================================================
// Strength
// =============================================================================

/// Denoising strength for image-to-image generation, guaranteed to be
/// within valid range (0.0–1.0).
///
/// Low values preserve the source image, high values let the model
/// repaint freely. Out-of-range input is clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strength(f32);

impl Strength {
    /// Creates a new strength, clamping the value to the valid range.
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self(value.clamp(strength_bounds::MIN, strength_bounds::MAX))
    }

    /// Returns the raw strength value.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns true if at minimum strength.
    #[must_use]
    pub fn is_min(self) -> bool {
        (self.0 - strength_bounds::MIN).abs() < f32::EPSILON
    }

    /// Returns true if at maximum strength.
    #[must_use]
    pub fn is_max(self) -> bool {
        (self.0 - strength_bounds::MAX).abs() < f32::EPSILON
    }
}

impl Default for Strength {
    fn default() -> Self {
        Self(strength_bounds::DEFAULT)
    }
}

// =============================================================================
// Dilation Bounds
// =============================================================================

/// Mask dilation bounds in pixels (0 to 200).
pub mod dilation_bounds {
    /// Minimum dilation; the mask follows the lasso outline exactly.
    pub const MIN: f32 = 0.0;
    /// Maximum dilation width in pixels.
    pub const MAX: f32 = 200.0;
    /// Default dilation, matching the capture brush width.
    pub const DEFAULT: f32 = 25.0;
}

// =============================================================================
// DilationWidth
// =============================================================================

/// Width in pixels of the stroke drawn along the selection outline when
/// rasterizing, guaranteed to be within valid range (0–200).
///
/// Growing the mask outward lets edits blend past the exact lasso
/// boundary instead of producing a hard seam.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DilationWidth(f32);

impl DilationWidth {
    /// Creates a new dilation width, clamping the value to the valid range.
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self(value.clamp(dilation_bounds::MIN, dilation_bounds::MAX))
    }

    /// Returns the raw width in pixels.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns true if at minimum width.
    #[must_use]
    pub fn is_min(self) -> bool {
        (self.0 - dilation_bounds::MIN).abs() < f32::EPSILON
    }

    /// Returns true if at maximum width.
    #[must_use]
    pub fn is_max(self) -> bool {
        (self.0 - dilation_bounds::MAX).abs() < f32::EPSILON
    }
}

impl Default for DilationWidth {
    fn default() -> Self {
        Self(dilation_bounds::DEFAULT)
    }
}

// =============================================================================
// Feather Bounds
// =============================================================================

/// Mask feather bounds in pixels (0 to 64).
pub mod feather_bounds {
    /// Minimum feather; mask edges stay hard.
    pub const MIN: u32 = 0;
    /// Maximum feather radius in pixels.
    pub const MAX: u32 = 64;
    /// Default feather radius.
    pub const DEFAULT: u32 = 0;
}

// =============================================================================
// FeatherRadius
// =============================================================================

/// Blur radius in pixels applied to the rasterized mask, guaranteed to be
/// within valid range (0–64). Zero leaves the mask edges hard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatherRadius(u32);

impl FeatherRadius {
    /// Creates a new feather radius, clamping the value to the valid range.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value.clamp(feather_bounds::MIN, feather_bounds::MAX))
    }

    /// Returns the raw radius in pixels.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Returns true if at minimum radius.
    #[must_use]
    pub fn is_min(self) -> bool {
        self.0 == feather_bounds::MIN
    }

    /// Returns true if at maximum radius.
    #[must_use]
    pub fn is_max(self) -> bool {
        self.0 == feather_bounds::MAX
    }
}

impl Default for FeatherRadius {
    fn default() -> Self {
        Self(feather_bounds::DEFAULT)
    }
}

// =============================================================================
// Correction Bounds
// =============================================================================

/// Color correction bounds (0.05 to 1.0).
pub mod correction_bounds {
    /// Minimum correction weighting.
    pub const MIN: f32 = 0.05;
    /// Maximum correction weighting; the full measured offset is applied.
    pub const MAX: f32 = 1.0;
    /// Default correction weighting.
    pub const DEFAULT: f32 = 0.85;
}

// =============================================================================
// CorrectionFactor
// =============================================================================

/// Fraction of the measured color offset applied when matching the edited
/// patch to its surroundings, guaranteed to be within valid range
/// (0.05–1.0). Full correction tends to overshoot, so the default stays
/// below `1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionFactor(f32);

impl CorrectionFactor {
    /// Creates a new correction factor, clamping the value to the valid range.
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self(value.clamp(correction_bounds::MIN, correction_bounds::MAX))
    }

    /// Returns the raw factor value.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns true if at minimum weighting.
    #[must_use]
    pub fn is_min(self) -> bool {
        (self.0 - correction_bounds::MIN).abs() < f32::EPSILON
    }

    /// Returns true if at maximum weighting.
    #[must_use]
    pub fn is_max(self) -> bool {
        (self.0 - correction_bounds::MAX).abs() < f32::EPSILON
    }
}

impl Default for CorrectionFactor {
    fn default() -> Self {
        Self(correction_bounds::DEFAULT)
    }
}
