// SPDX-License-Identifier: MPL-2.0
//! Freehand lasso selection model.
//!
//! This module provides:
//! - [`LassoPath`]: a committed closed polygon outline
//! - [`Selection`]: the ordered set of committed paths awaiting an edit
//! - [`StrokeRecorder`]: capture of an in-progress stroke, point by point
//! - [`DisplayMapping`]: conversion from display coordinates to buffer
//!   coordinates when the image is shown at a different size
//!
//! Paths are stored in image-buffer coordinates. A stroke only becomes part
//! of the selection once it carries enough points to describe an area;
//! accidental clicks and tiny drags are discarded on release.

use crate::domain::geometry::{BoundingBox, Point};

// ============================================================================
// LassoPath
// ============================================================================

/// A closed freehand outline, committed from a finished stroke.
///
/// The closing edge from the last point back to the first is implicit.
#[derive(Debug, Clone, PartialEq)]
pub struct LassoPath {
    points: Vec<Point>,
}

// A committed path always holds points, so `is_empty` would be constant.
#[allow(clippy::len_without_is_empty)]
impl LassoPath {
    /// Minimum number of points a committed path must carry. Anything
    /// shorter cannot enclose an area.
    pub const MIN_POINTS: usize = 3;

    /// Creates a path from captured points.
    ///
    /// # Panics
    ///
    /// Panics if `points` holds fewer than [`LassoPath::MIN_POINTS`] entries.
    /// Strokes below that length are filtered out by [`StrokeRecorder::end`].
    #[must_use]
    pub fn new(points: Vec<Point>) -> Self {
        assert!(
            points.len() >= Self::MIN_POINTS,
            "a lasso path requires at least {} points",
            Self::MIN_POINTS
        );
        Self { points }
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }
}

// ============================================================================
// Selection
// ============================================================================

/// The set of committed lasso paths, in commit order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    paths: Vec<LassoPath>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: LassoPath) {
        self.paths.push(path);
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    #[must_use]
    pub fn paths(&self) -> &[LassoPath] {
        &self.paths
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Total number of points across all committed paths.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.paths.iter().map(LassoPath::len).sum()
    }

    /// Tightest box around every committed point, or `None` when the
    /// selection is empty.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.paths.iter().flat_map(|path| path.points()))
    }
}

// ============================================================================
// StrokeRecorder
// ============================================================================

/// Captures one stroke at a time as pointer samples arrive.
///
/// `begin` discards any unfinished stroke, `extend` appends while a stroke
/// is active and `end` commits the stroke as a [`LassoPath`] when it holds
/// more than two points.
#[derive(Debug, Clone, Default)]
pub struct StrokeRecorder {
    current: Vec<Point>,
    active: bool,
}

impl StrokeRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new stroke at `point`, dropping any unfinished one.
    pub fn begin(&mut self, point: Point) {
        self.current.clear();
        self.current.push(point);
        self.active = true;
    }

    /// Appends a sample to the active stroke. Ignored while no stroke is
    /// active, so stray pointer-move events cannot create paths.
    pub fn extend(&mut self, point: Point) {
        if self.active {
            self.current.push(point);
        }
    }

    /// Finishes the active stroke.
    ///
    /// Returns the committed path, or `None` when the stroke was too short
    /// to enclose an area (fewer than [`LassoPath::MIN_POINTS`] points) or
    /// no stroke was active.
    pub fn end(&mut self) -> Option<LassoPath> {
        if !self.active {
            return None;
        }
        self.active = false;
        let points = std::mem::take(&mut self.current);
        if points.len() >= LassoPath::MIN_POINTS {
            Some(LassoPath::new(points))
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Samples captured so far for the active stroke, for live preview.
    #[must_use]
    pub fn current_points(&self) -> &[Point] {
        &self.current
    }

    /// Drops any in-progress stroke without committing it.
    pub fn reset(&mut self) {
        self.current.clear();
        self.active = false;
    }
}

// ============================================================================
// DisplayMapping
// ============================================================================

/// Maps pointer positions from display space into image-buffer space.
///
/// The image may be shown scaled; each axis is scaled independently by the
/// ratio of buffer extent to displayed extent, after subtracting the
/// displayed rectangle's origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMapping {
    buffer_width: u32,
    buffer_height: u32,
    display_origin: Point,
    display_width: f32,
    display_height: f32,
}

impl DisplayMapping {
    /// Creates a mapping from the displayed rectangle onto a buffer.
    ///
    /// # Panics
    ///
    /// Panics if either displayed extent is not strictly positive.
    #[must_use]
    pub fn new(
        buffer_width: u32,
        buffer_height: u32,
        display_origin: Point,
        display_width: f32,
        display_height: f32,
    ) -> Self {
        assert!(
            display_width > 0.0 && display_height > 0.0,
            "display extents must be positive"
        );
        Self {
            buffer_width,
            buffer_height,
            display_origin,
            display_width,
            display_height,
        }
    }

    /// Converts a pointer position in display space to buffer coordinates.
    #[allow(clippy::cast_precision_loss)] // Image dimensions stay far below f32 precision limits.
    #[must_use]
    pub fn to_buffer(&self, position: Point) -> Point {
        let scale_x = self.buffer_width as f32 / self.display_width;
        let scale_y = self.buffer_height as f32 / self.display_height;
        Point::new(
            (position.x - self.display_origin.x) * scale_x,
            (position.y - self.display_origin.y) * scale_y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    fn triangle_points() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 8.0),
        ]
    }

    // ------------------------------------------------------------------------
    // LassoPath
    // ------------------------------------------------------------------------

    #[test]
    fn path_keeps_point_order() {
        let points = triangle_points();
        let path = LassoPath::new(points.clone());
        assert_eq!(path.points(), points.as_slice());
        assert_eq!(path.len(), 3);
    }

    #[test]
    #[should_panic(expected = "at least 3 points")]
    fn path_rejects_two_points() {
        let _ = LassoPath::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
    }

    // ------------------------------------------------------------------------
    // StrokeRecorder
    // ------------------------------------------------------------------------

    #[test]
    fn recorder_commits_stroke_with_three_points() {
        let mut recorder = StrokeRecorder::new();
        recorder.begin(Point::new(0.0, 0.0));
        recorder.extend(Point::new(10.0, 0.0));
        recorder.extend(Point::new(5.0, 8.0));
        let path = recorder.end().expect("stroke should commit");
        assert_eq!(path.len(), 3);
        assert!(!recorder.is_active());
    }

    #[test]
    fn recorder_discards_stroke_with_two_points() {
        let mut recorder = StrokeRecorder::new();
        recorder.begin(Point::new(0.0, 0.0));
        recorder.extend(Point::new(10.0, 0.0));
        assert!(recorder.end().is_none());
        assert!(recorder.current_points().is_empty());
    }

    #[test]
    fn recorder_discards_bare_click() {
        let mut recorder = StrokeRecorder::new();
        recorder.begin(Point::new(3.0, 3.0));
        assert!(recorder.end().is_none());
    }

    #[test]
    fn extend_without_begin_is_ignored() {
        let mut recorder = StrokeRecorder::new();
        recorder.extend(Point::new(1.0, 1.0));
        recorder.extend(Point::new(2.0, 2.0));
        recorder.extend(Point::new(3.0, 3.0));
        assert!(recorder.end().is_none());
        assert!(recorder.current_points().is_empty());
    }

    #[test]
    fn begin_drops_unfinished_stroke() {
        let mut recorder = StrokeRecorder::new();
        recorder.begin(Point::new(0.0, 0.0));
        recorder.extend(Point::new(1.0, 0.0));
        recorder.begin(Point::new(50.0, 50.0));
        recorder.extend(Point::new(51.0, 50.0));
        recorder.extend(Point::new(52.0, 51.0));
        let path = recorder.end().expect("second stroke should commit");
        assert_abs_diff_eq!(path.points()[0].x, 50.0);
        assert_eq!(path.len(), 3);
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    #[test]
    fn selection_tracks_paths_in_commit_order() {
        let mut selection = Selection::new();
        assert!(selection.is_empty());
        selection.push(LassoPath::new(triangle_points()));
        selection.push(LassoPath::new(vec![
            Point::new(20.0, 20.0),
            Point::new(30.0, 20.0),
            Point::new(25.0, 30.0),
        ]));
        assert_eq!(selection.len(), 2);
        assert_eq!(selection.point_count(), 6);
        assert_abs_diff_eq!(selection.paths()[0].points()[0].x, 0.0);
        assert_abs_diff_eq!(selection.paths()[1].points()[0].x, 20.0);
    }

    #[test]
    fn selection_bounding_box_spans_all_paths() {
        let mut selection = Selection::new();
        selection.push(LassoPath::new(triangle_points()));
        selection.push(LassoPath::new(vec![
            Point::new(40.0, 40.0),
            Point::new(60.0, 40.0),
            Point::new(50.0, 70.0),
        ]));
        let bounds = selection.bounding_box().expect("non-empty selection");
        assert_abs_diff_eq!(bounds.min_x, 0.0);
        assert_abs_diff_eq!(bounds.max_x, 60.0);
        assert_abs_diff_eq!(bounds.max_y, 70.0);
    }

    #[test]
    fn empty_selection_has_no_bounding_box() {
        assert!(Selection::new().bounding_box().is_none());
    }

    #[test]
    fn clear_removes_all_paths() {
        let mut selection = Selection::new();
        selection.push(LassoPath::new(triangle_points()));
        selection.clear();
        assert!(selection.is_empty());
    }

    // ------------------------------------------------------------------------
    // DisplayMapping
    // ------------------------------------------------------------------------

    #[test]
    fn mapping_scales_each_axis_independently() {
        // 1024x512 buffer shown as a 512x512 rectangle at (100, 50).
        let mapping = DisplayMapping::new(1024, 512, Point::new(100.0, 50.0), 512.0, 512.0);
        let mapped = mapping.to_buffer(Point::new(356.0, 178.0));
        assert_abs_diff_eq!(mapped.x, 512.0);
        assert_abs_diff_eq!(mapped.y, 128.0);
    }

    #[test]
    fn mapping_is_identity_when_display_matches_buffer() {
        let mapping = DisplayMapping::new(640, 480, Point::new(0.0, 0.0), 640.0, 480.0);
        let mapped = mapping.to_buffer(Point::new(123.0, 45.0));
        assert_abs_diff_eq!(mapped.x, 123.0);
        assert_abs_diff_eq!(mapped.y, 45.0);
    }

    #[test]
    #[should_panic(expected = "display extents must be positive")]
    fn mapping_rejects_zero_display_width() {
        let _ = DisplayMapping::new(640, 480, Point::new(0.0, 0.0), 0.0, 480.0);
    }
}
