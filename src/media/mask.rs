// SPDX-License-Identifier: MPL-2.0
//! Selection-to-mask rasterization.
//!
//! Renders committed lasso paths into a single-channel intensity mask the
//! size of the working image: white (255) marks pixels to edit, black (0)
//! pixels to preserve. Each path is filled and its outline stroked with a
//! round-capped pen of the configured dilation width, so the editable area
//! reaches slightly past the drawn boundary. Inversion and feathering run
//! after rasterization.

use crate::domain::editing::{DilationWidth, FeatherRadius};
use crate::domain::media::Mask;
use crate::domain::selection::{LassoPath, Selection};
use crate::media::blur;
use std::fmt;
use tiny_skia::{
    Color, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform,
};

// ============================================================================
// Errors
// ============================================================================

/// Errors from mask rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskError {
    /// The target canvas has no extent, which happens when no image has
    /// been loaded yet.
    InvalidDimensions { width: u32, height: u32 },
}

impl fmt::Display for MaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskError::InvalidDimensions { width, height } => {
                write!(f, "cannot rasterize onto a {width}x{height} canvas")
            }
        }
    }
}

impl std::error::Error for MaskError {}

// ============================================================================
// Options
// ============================================================================

/// Rasterization parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MaskOptions {
    /// Stroke width applied along each path outline.
    pub dilation: DilationWidth,
    /// Blur radius applied to the finished mask.
    pub feather: FeatherRadius,
    /// Flips every intensity, turning the mask into "edit everything but
    /// the selection".
    pub invert: bool,
}

// ============================================================================
// Rasterization
// ============================================================================

/// Rasterizes a selection into an intensity mask.
///
/// An empty selection yields an all-zero mask (or all-255 when inverted).
/// Paths reaching outside the canvas are clipped.
///
/// # Errors
///
/// Returns [`MaskError::InvalidDimensions`] when either dimension is zero.
pub fn rasterize(
    selection: &Selection,
    width: u32,
    height: u32,
    options: &MaskOptions,
) -> Result<Mask, MaskError> {
    let mut pixmap =
        Pixmap::new(width, height).ok_or(MaskError::InvalidDimensions { width, height })?;
    pixmap.fill(Color::BLACK);

    let mut paint = Paint::default();
    paint.set_color_rgba8(255, 255, 255, 255);
    paint.anti_alias = true;

    let stroke = Stroke {
        width: options.dilation.value(),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    for path in selection.paths() {
        let Some(outline) = build_outline(path) else {
            continue;
        };
        pixmap.fill_path(
            &outline,
            &paint,
            FillRule::Winding,
            Transform::identity(),
            None,
        );
        if !options.dilation.is_min() {
            pixmap.stroke_path(&outline, &paint, &stroke, Transform::identity(), None);
        }
    }

    // White on opaque black premultiplies to the coverage itself, so any
    // channel doubles as the intensity.
    let mut data = Vec::with_capacity((width as usize) * (height as usize));
    data.extend(pixmap.data().chunks_exact(4).map(|pixel| pixel[0]));

    if options.invert {
        for value in &mut data {
            *value = 255 - *value;
        }
    }

    if !options.feather.is_min() {
        blur::box_blur(
            &mut data,
            width as usize,
            height as usize,
            options.feather.value() as usize,
        );
    }

    Ok(Mask::new(width, height, data))
}

/// Builds a closed tiny-skia path from a committed lasso path.
fn build_outline(path: &LassoPath) -> Option<tiny_skia::Path> {
    let points = path.points();
    let mut builder = PathBuilder::new();
    builder.move_to(points[0].x, points[0].y);
    for point in &points[1..] {
        builder.line_to(point.x, point.y);
    }
    builder.close();
    builder.finish()
}
