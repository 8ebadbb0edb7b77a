// SPDX-License-Identifier: MPL-2.0
//! Bounded undo history for selections and committed edits.
//!
//! Every entry is a snapshot of state after a change: committing a stroke
//! or clearing the selection records the resulting [`Selection`], a
//! committed edit records the new working image alongside its (empty)
//! selection. Undo moves a cursor back across these snapshots; recording
//! after an undo discards the abandoned tail. The history keeps at most
//! [`HISTORY_CAPACITY`] entries and evicts the oldest beyond that.

use crate::domain::media::RawImage;
use crate::domain::selection::Selection;

/// Maximum number of retained snapshots.
pub const HISTORY_CAPACITY: usize = 20;

/// One undoable state snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEntry {
    /// The selection after a stroke commit or clear.
    Selection(Selection),
    /// The working image and selection after a committed edit.
    Edit {
        image: RawImage,
        selection: Selection,
    },
}

/// Snapshot stack with a live cursor.
///
/// Entries up to the cursor are "live"; undo moves the cursor back
/// without dropping entries, and the next record truncates whatever lies
/// beyond it.
#[derive(Debug, Clone)]
pub struct SelectionHistory {
    entries: Vec<HistoryEntry>,
    live: usize,
    capacity: usize,
}

impl SelectionHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// Creates a history bounded to `capacity` snapshots (at least one).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            live: 0,
            capacity: capacity.max(1),
        }
    }

    /// Records a snapshot, discarding any undone tail first and evicting
    /// the oldest snapshot when over capacity.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.live);
        self.entries.push(entry);
        if self.entries.len() > self.capacity {
            self.entries.remove(0);
        }
        self.live = self.entries.len();
    }

    /// Moves the cursor one snapshot back. Returns false when already at
    /// the beginning.
    pub fn undo(&mut self) -> bool {
        if self.live == 0 {
            return false;
        }
        self.live -= 1;
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.live > 0
    }

    /// Snapshots up to the live cursor, oldest first.
    #[must_use]
    pub fn live_entries(&self) -> &[HistoryEntry] {
        &self.entries[..self.live]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every snapshot and resets the cursor.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.live = 0;
    }
}

impl Default for SelectionHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::Point;
    use crate::domain::selection::LassoPath;

    fn selection_with_one_path(x: f32) -> Selection {
        let mut selection = Selection::new();
        selection.push(LassoPath::new(vec![
            Point::new(x, 0.0),
            Point::new(x + 10.0, 0.0),
            Point::new(x + 5.0, 10.0),
        ]));
        selection
    }

    fn snapshot(x: f32) -> HistoryEntry {
        HistoryEntry::Selection(selection_with_one_path(x))
    }

    #[test]
    fn record_appends_and_moves_the_cursor() {
        let mut history = SelectionHistory::new();
        assert!(!history.can_undo());

        history.record(snapshot(0.0));
        history.record(snapshot(10.0));

        assert_eq!(history.len(), 2);
        assert_eq!(history.live_entries().len(), 2);
        assert!(history.can_undo());
    }

    #[test]
    fn undo_respects_history_bounds() {
        let mut history = SelectionHistory::new();
        history.record(snapshot(0.0));

        assert!(history.undo());
        assert!(!history.can_undo());
        assert!(!history.undo());
        assert!(history.live_entries().is_empty());
    }

    #[test]
    fn undo_hides_entries_without_dropping_them() {
        let mut history = SelectionHistory::new();
        history.record(snapshot(0.0));
        history.record(snapshot(10.0));

        history.undo();
        assert_eq!(history.live_entries().len(), 1);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn recording_after_undo_discards_the_abandoned_tail() {
        let mut history = SelectionHistory::new();
        history.record(snapshot(0.0));
        history.record(snapshot(10.0));
        history.record(snapshot(20.0));

        history.undo();
        history.undo();
        history.record(snapshot(99.0));

        assert_eq!(history.len(), 2);
        assert_eq!(history.live_entries().len(), 2);
        match history.live_entries().last() {
            Some(HistoryEntry::Selection(selection)) => {
                assert!((selection.paths()[0].points()[0].x - 99.0).abs() < f32::EPSILON);
            }
            other => panic!("expected a selection snapshot, got {other:?}"),
        }
    }

    #[test]
    fn capacity_evicts_the_oldest_snapshot() {
        let mut history = SelectionHistory::with_capacity(3);
        for i in 0..5 {
            history.record(snapshot(i as f32));
        }

        assert_eq!(history.len(), 3);
        match &history.live_entries()[0] {
            HistoryEntry::Selection(selection) => {
                // Snapshots 0 and 1 were evicted.
                assert!((selection.paths()[0].points()[0].x - 2.0).abs() < f32::EPSILON);
            }
            other => panic!("expected a selection snapshot, got {other:?}"),
        }
    }

    #[test]
    fn default_capacity_holds_twenty_snapshots() {
        let mut history = SelectionHistory::new();
        for i in 0..25 {
            history.record(snapshot(i as f32));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
    }

    #[test]
    fn reset_clears_everything() {
        let mut history = SelectionHistory::new();
        history.record(snapshot(0.0));
        history.undo();

        history.reset();
        assert!(history.is_empty());
        assert!(!history.can_undo());
    }

    #[test]
    fn edit_snapshots_carry_the_image() {
        let mut history = SelectionHistory::new();
        let image = RawImage::from_rgba(2, 2, vec![7u8; 16]);
        history.record(HistoryEntry::Edit {
            image: image.clone(),
            selection: Selection::new(),
        });

        match &history.live_entries()[0] {
            HistoryEntry::Edit {
                image: recorded, ..
            } => assert_eq!(recorded, &image),
            other => panic!("expected an edit snapshot, got {other:?}"),
        }
    }
}
