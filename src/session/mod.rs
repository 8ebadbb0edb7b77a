// SPDX-License-Identifier: MPL-2.0
//! The canvas and history store.
//!
//! [`EditSession`] owns the only mutable state in the pipeline: the
//! working image, the committed selection, the in-progress stroke and the
//! undo history. Everything else operates on snapshots handed out from
//! here, and edits come back through [`EditSession::commit_edit`], the
//! single mutation entry point. A version counter increments whenever a
//! new image is loaded so that responses prepared against an older image
//! are detected and discarded instead of committed.

pub mod history;

pub use history::{HistoryEntry, SelectionHistory, HISTORY_CAPACITY};

use crate::domain::geometry::Point;
use crate::domain::media::RawImage;
use crate::domain::selection::{Selection, StrokeRecorder};
use std::fmt;

// ============================================================================
// Errors
// ============================================================================

/// Errors from committing into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The response was prepared against an image that has since been
    /// replaced.
    StaleResponse { submitted: u64, current: u64 },
    /// No image has been loaded, so there is nothing to commit onto.
    NoImage,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::StaleResponse { submitted, current } => write!(
                f,
                "discarding response for image version {submitted}; current version is {current}"
            ),
            SessionError::NoImage => write!(f, "no working image to commit onto"),
        }
    }
}

impl std::error::Error for SessionError {}

// ============================================================================
// EditSession
// ============================================================================

/// Owns the working image, selection and undo history for one canvas.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    /// Current composited image, replaced by commits and undo.
    working: Option<RawImage>,
    /// The image as loaded, the floor every undo chain bottoms out on.
    baseline: Option<RawImage>,
    selection: Selection,
    recorder: StrokeRecorder,
    history: SelectionHistory,
    version: u64,
}

impl EditSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a new image, clearing the selection and history and bumping
    /// the version so in-flight responses against the old image get
    /// discarded.
    pub fn load_image(&mut self, image: RawImage) {
        self.working = Some(image.clone());
        self.baseline = Some(image);
        self.selection.clear();
        self.recorder.reset();
        self.history.reset();
        // The empty selection is itself the first undoable state.
        self.history
            .record(HistoryEntry::Selection(self.selection.clone()));
        self.version += 1;
    }

    #[must_use]
    pub fn has_image(&self) -> bool {
        self.working.is_some()
    }

    #[must_use]
    pub fn working_image(&self) -> Option<&RawImage> {
        self.working.as_ref()
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Version of the current working image lineage.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    // ------------------------------------------------------------------------
    // Stroke capture
    // ------------------------------------------------------------------------

    /// Starts a new stroke at `point` in buffer coordinates.
    pub fn begin_stroke(&mut self, point: Point) {
        self.recorder.begin(point);
    }

    /// Appends a sample to the active stroke.
    pub fn extend_stroke(&mut self, point: Point) {
        self.recorder.extend(point);
    }

    /// Finishes the active stroke. Returns true when the stroke committed
    /// into the selection; short strokes are discarded and change nothing.
    pub fn end_stroke(&mut self) -> bool {
        match self.recorder.end() {
            Some(path) => {
                self.selection.push(path);
                self.history
                    .record(HistoryEntry::Selection(self.selection.clone()));
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.recorder.is_active()
    }

    /// Samples of the in-progress stroke, for live preview.
    #[must_use]
    pub fn stroke_preview(&self) -> &[Point] {
        self.recorder.current_points()
    }

    // ------------------------------------------------------------------------
    // Selection mutations
    // ------------------------------------------------------------------------

    /// Drops every committed path and any in-progress stroke, recording
    /// the cleared state so it can be undone.
    pub fn clear_selection(&mut self) {
        self.recorder.reset();
        self.selection.clear();
        self.history
            .record(HistoryEntry::Selection(self.selection.clone()));
    }

    /// Steps back one snapshot, restoring both the selection and, when an
    /// edit is undone, the previous working image. Past the beginning the
    /// state settles on an empty selection over the baseline image.
    pub fn undo(&mut self) {
        self.recorder.reset();
        self.history.undo();

        let live = self.history.live_entries();
        self.selection = match live.last() {
            Some(HistoryEntry::Selection(selection)) => selection.clone(),
            Some(HistoryEntry::Edit { selection, .. }) => selection.clone(),
            None => Selection::new(),
        };
        if self.working.is_some() {
            self.working = live
                .iter()
                .rev()
                .find_map(|entry| match entry {
                    HistoryEntry::Edit { image, .. } => Some(image.clone()),
                    HistoryEntry::Selection(_) => None,
                })
                .or_else(|| self.baseline.clone());
        }
    }

    // ------------------------------------------------------------------------
    // Edit commits
    // ------------------------------------------------------------------------

    /// Commits a composited edit produced against `version`.
    ///
    /// The working image is replaced, the selection cleared and the new
    /// state recorded for undo.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::StaleResponse`] when the session has moved
    /// to a different image since the request was prepared, and
    /// [`SessionError::NoImage`] when no image is loaded at all.
    pub fn commit_edit(&mut self, version: u64, image: RawImage) -> Result<(), SessionError> {
        if self.working.is_none() {
            return Err(SessionError::NoImage);
        }
        if version != self.version {
            return Err(SessionError::StaleResponse {
                submitted: version,
                current: self.version,
            });
        }

        self.working = Some(image.clone());
        self.selection.clear();
        self.recorder.reset();
        self.history.record(HistoryEntry::Edit {
            image,
            selection: self.selection.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_image(value: u8) -> RawImage {
        RawImage::from_rgba(2, 2, vec![value; 16])
    }

    /// Draws a committable triangle stroke offset by `x`.
    fn draw_stroke(session: &mut EditSession, x: f32) {
        session.begin_stroke(Point::new(x, 0.0));
        session.extend_stroke(Point::new(x + 10.0, 0.0));
        session.extend_stroke(Point::new(x + 5.0, 10.0));
        assert!(session.end_stroke());
    }

    #[test]
    fn new_session_is_empty() {
        let session = EditSession::new();
        assert!(!session.has_image());
        assert!(session.selection().is_empty());
        assert!(!session.can_undo());
        assert_eq!(session.version(), 0);
    }

    #[test]
    fn load_image_resets_state_and_bumps_version() {
        let mut session = EditSession::new();
        draw_stroke(&mut session, 0.0);

        session.load_image(solid_image(1));
        assert!(session.has_image());
        assert!(session.selection().is_empty());
        assert_eq!(session.version(), 1);

        session.load_image(solid_image(2));
        assert_eq!(session.version(), 2);
        assert_eq!(session.working_image(), Some(&solid_image(2)));
    }

    #[test]
    fn strokes_commit_into_the_selection() {
        let mut session = EditSession::new();
        session.load_image(solid_image(1));

        draw_stroke(&mut session, 0.0);
        draw_stroke(&mut session, 20.0);
        assert_eq!(session.selection().len(), 2);
    }

    #[test]
    fn short_strokes_change_nothing() {
        let mut session = EditSession::new();
        session.load_image(solid_image(1));

        session.begin_stroke(Point::new(0.0, 0.0));
        session.extend_stroke(Point::new(1.0, 0.0));
        assert!(!session.end_stroke());
        assert!(session.selection().is_empty());
    }

    #[test]
    fn undo_restores_the_previous_selection() {
        let mut session = EditSession::new();
        session.load_image(solid_image(1));
        draw_stroke(&mut session, 0.0);
        draw_stroke(&mut session, 20.0);

        session.undo();
        assert_eq!(session.selection().len(), 1);

        session.undo();
        assert!(session.selection().is_empty());
    }

    #[test]
    fn undo_past_the_beginning_settles_on_empty_state() {
        let mut session = EditSession::new();
        session.load_image(solid_image(1));
        draw_stroke(&mut session, 0.0);

        for _ in 0..5 {
            session.undo();
        }
        assert!(session.selection().is_empty());
        assert_eq!(session.working_image(), Some(&solid_image(1)));
    }

    #[test]
    fn clear_selection_can_be_undone() {
        let mut session = EditSession::new();
        session.load_image(solid_image(1));
        draw_stroke(&mut session, 0.0);

        session.clear_selection();
        assert!(session.selection().is_empty());

        session.undo();
        assert_eq!(session.selection().len(), 1);
    }

    #[test]
    fn undo_drops_an_in_progress_stroke() {
        let mut session = EditSession::new();
        session.load_image(solid_image(1));
        session.begin_stroke(Point::new(0.0, 0.0));

        session.undo();
        assert!(!session.is_drawing());
        assert!(session.stroke_preview().is_empty());
    }

    #[test]
    fn commit_edit_replaces_image_and_clears_selection() {
        let mut session = EditSession::new();
        session.load_image(solid_image(1));
        draw_stroke(&mut session, 0.0);

        session
            .commit_edit(session.version(), solid_image(9))
            .unwrap();
        assert_eq!(session.working_image(), Some(&solid_image(9)));
        assert!(session.selection().is_empty());
    }

    #[test]
    fn commit_edit_rejects_stale_versions() {
        let mut session = EditSession::new();
        session.load_image(solid_image(1));
        let captured = session.version();

        session.load_image(solid_image(2));
        let result = session.commit_edit(captured, solid_image(9));
        assert_eq!(
            result,
            Err(SessionError::StaleResponse {
                submitted: captured,
                current: session.version(),
            })
        );
        // The newer image stays untouched.
        assert_eq!(session.working_image(), Some(&solid_image(2)));
    }

    #[test]
    fn commit_without_an_image_is_rejected() {
        let mut session = EditSession::new();
        assert_eq!(
            session.commit_edit(0, solid_image(9)),
            Err(SessionError::NoImage)
        );
    }

    #[test]
    fn undo_after_an_edit_restores_image_and_selection() {
        let mut session = EditSession::new();
        session.load_image(solid_image(1));
        draw_stroke(&mut session, 0.0);
        session
            .commit_edit(session.version(), solid_image(9))
            .unwrap();

        session.undo();
        assert_eq!(session.working_image(), Some(&solid_image(1)));
        assert_eq!(session.selection().len(), 1);
    }

    #[test]
    fn undo_between_chained_edits_restores_the_intermediate_image() {
        let mut session = EditSession::new();
        session.load_image(solid_image(1));
        draw_stroke(&mut session, 0.0);
        session
            .commit_edit(session.version(), solid_image(5))
            .unwrap();
        draw_stroke(&mut session, 20.0);
        session
            .commit_edit(session.version(), solid_image(9))
            .unwrap();

        session.undo();
        assert_eq!(session.working_image(), Some(&solid_image(5)));
        assert_eq!(session.selection().len(), 1);
    }

    #[test]
    fn commit_does_not_change_the_version() {
        let mut session = EditSession::new();
        session.load_image(solid_image(1));
        let version = session.version();

        session.commit_edit(version, solid_image(9)).unwrap();
        assert_eq!(session.version(), version);

        // A follow-up edit against the same lineage still commits.
        session.commit_edit(version, solid_image(10)).unwrap();
        assert_eq!(session.working_image(), Some(&solid_image(10)));
    }

    #[test]
    fn deep_histories_stay_consistent_after_eviction() {
        let mut session = EditSession::new();
        session.load_image(solid_image(1));
        for i in 0..25 {
            draw_stroke(&mut session, (i * 10) as f32);
        }

        for _ in 0..HISTORY_CAPACITY {
            session.undo();
        }
        // The oldest snapshots were evicted; undo bottoms out on the
        // empty selection over the baseline.
        assert!(session.selection().is_empty());
        assert_eq!(session.working_image(), Some(&solid_image(1)));
        assert!(!session.can_undo());
    }
}
