// SPDX-License-Identifier: MPL-2.0
//! Spatial analysis of a selection against its canvas.
//!
//! Summarizes where a selection sits (a 3x3 grid of thirds) and how much
//! of the canvas it covers (five size buckets). The resulting
//! [`RegionDescriptor`] feeds prompt enrichment, so generation models get
//! told "in the top left area" and "small size" instead of raw pixels.

use crate::domain::geometry::BoundingBox;
use crate::domain::selection::Selection;
use std::fmt;

/// Center positions below this fraction of the canvas extent fall into the
/// first third (left or top).
pub const LOWER_THIRD_BOUNDARY: f32 = 0.35;
/// Center positions above this fraction of the canvas extent fall into the
/// last third (right or bottom).
pub const UPPER_THIRD_BOUNDARY: f32 = 0.65;

/// Area fractions at or below which a region counts as very small.
pub const VERY_SMALL_AREA: f32 = 0.01;
/// Area fractions at or below which a region counts as small.
pub const SMALL_AREA: f32 = 0.05;
/// Area fractions above which a region counts as large.
pub const LARGE_AREA: f32 = 0.20;
/// Area fractions above which a region counts as very large.
pub const VERY_LARGE_AREA: f32 = 0.40;

// ============================================================================
// Errors
// ============================================================================

/// Errors from region analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionError {
    /// The selection holds no committed paths, so there is nothing to place.
    EmptySelection,
}

impl fmt::Display for RegionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionError::EmptySelection => {
                write!(f, "cannot analyze an empty selection")
            }
        }
    }
}

impl std::error::Error for RegionError {}

// ============================================================================
// Grid positions
// ============================================================================

/// Horizontal third of the canvas holding the selection center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalThird {
    Left,
    Center,
    Right,
}

impl HorizontalThird {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            HorizontalThird::Left => "left",
            HorizontalThird::Center => "center",
            HorizontalThird::Right => "right",
        }
    }
}

/// Vertical third of the canvas holding the selection center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalThird {
    Top,
    Middle,
    Bottom,
}

impl VerticalThird {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            VerticalThird::Top => "top",
            VerticalThird::Middle => "middle",
            VerticalThird::Bottom => "bottom",
        }
    }
}

// ============================================================================
// Size buckets
// ============================================================================

/// Relative footprint of the selection on its canvas.
///
/// Ordered from smallest to largest, so buckets can be compared directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SizeBucket {
    VerySmall,
    Small,
    Medium,
    Large,
    VeryLarge,
}

impl SizeBucket {
    /// Buckets a bounding-box area given as a fraction of the canvas area.
    #[must_use]
    pub fn for_area_fraction(fraction: f32) -> Self {
        if fraction < VERY_SMALL_AREA {
            SizeBucket::VerySmall
        } else if fraction < SMALL_AREA {
            SizeBucket::Small
        } else if fraction > VERY_LARGE_AREA {
            SizeBucket::VeryLarge
        } else if fraction > LARGE_AREA {
            SizeBucket::Large
        } else {
            SizeBucket::Medium
        }
    }

    /// Phrase used in enriched prompts.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SizeBucket::VerySmall => "very small size",
            SizeBucket::Small => "small size",
            SizeBucket::Medium => "medium size",
            SizeBucket::Large => "large size",
            SizeBucket::VeryLarge => "very large size",
        }
    }
}

// ============================================================================
// RegionDescriptor
// ============================================================================

/// Where a selection sits and how much of the canvas it covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionDescriptor {
    /// Tight box around every committed point, in buffer coordinates.
    pub bounds: BoundingBox,
    /// Horizontal third holding the box center.
    pub column: HorizontalThird,
    /// Vertical third holding the box center.
    pub row: VerticalThird,
    /// Size bucket derived from the covered area.
    pub size: SizeBucket,
    /// Bounding-box area as a fraction of the canvas area.
    pub area_fraction: f32,
}

impl RegionDescriptor {
    /// Human-readable placement, e.g. `"top left"`, or `"center"` when the
    /// box center falls into the middle third on both axes.
    #[must_use]
    pub fn position_label(&self) -> String {
        if self.column == HorizontalThird::Center && self.row == VerticalThird::Middle {
            "center".to_string()
        } else {
            format!("{} {}", self.row.label(), self.column.label())
        }
    }

    /// Phrase used in enriched prompts for the covered area.
    #[must_use]
    pub fn size_label(&self) -> &'static str {
        self.size.label()
    }
}

/// Analyzes a selection against a canvas of the given pixel dimensions.
///
/// The placement is judged from the bounding-box center, the size from the
/// bounding-box area. Only committed paths count.
///
/// # Errors
///
/// Returns [`RegionError::EmptySelection`] when the selection holds no
/// committed paths.
#[allow(clippy::cast_precision_loss)] // Canvas dimensions stay far below f32 precision limits.
pub fn analyze(
    selection: &Selection,
    canvas_width: u32,
    canvas_height: u32,
) -> Result<RegionDescriptor, RegionError> {
    debug_assert!(canvas_width > 0 && canvas_height > 0);

    let bounds = selection
        .bounding_box()
        .ok_or(RegionError::EmptySelection)?;

    let center = bounds.center();
    let relative_x = center.x / canvas_width as f32;
    let relative_y = center.y / canvas_height as f32;

    let column = if relative_x < LOWER_THIRD_BOUNDARY {
        HorizontalThird::Left
    } else if relative_x > UPPER_THIRD_BOUNDARY {
        HorizontalThird::Right
    } else {
        HorizontalThird::Center
    };

    let row = if relative_y < LOWER_THIRD_BOUNDARY {
        VerticalThird::Top
    } else if relative_y > UPPER_THIRD_BOUNDARY {
        VerticalThird::Bottom
    } else {
        VerticalThird::Middle
    };

    let canvas_area = (canvas_width as f32) * (canvas_height as f32);
    let area_fraction = bounds.area() / canvas_area;
    let size = SizeBucket::for_area_fraction(area_fraction);

    Ok(RegionDescriptor {
        bounds,
        column,
        row,
        size,
        area_fraction,
    })
}
