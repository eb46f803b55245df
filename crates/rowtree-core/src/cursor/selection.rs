//! Multi-record selection over a cursor.

use super::{Cursor, CursorDecorator, RecordCursor};
use crate::arranged::Fields;
use crate::error::Result;

/// Cursor extension tracking a set of selected records.
///
/// Records are identified by value: a record is selected when its plain
/// field snapshot equals a selected entry, regardless of field order. Joint
/// data is never inspected.
#[derive(Debug, Clone)]
pub struct SelectionCursor<C: Cursor = RecordCursor> {
    inner: C,
    selected: Vec<Fields>,
}

impl<C: Cursor> SelectionCursor<C> {
    /// Wrap a cursor with an empty selection.
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            selected: Vec::new(),
        }
    }

    /// Add a record snapshot to the selection.
    pub fn select_record(&mut self, fields: Fields) {
        if !self.selected.contains(&fields) {
            self.selected.push(fields);
        }
    }

    /// Select the current record.
    pub fn select_current(&mut self) -> Result<()> {
        let fields = self.inner.fields()?.clone();
        self.select_record(fields);
        Ok(())
    }

    /// Remove a record snapshot from the selection.
    ///
    /// Returns whether anything was removed.
    pub fn clear_selected_record(&mut self, fields: &Fields) -> bool {
        let before = self.selected.len();
        self.selected.retain(|selected| selected != fields);
        self.selected.len() != before
    }

    /// Remove every record from the selection.
    pub fn clear_selected_records(&mut self) {
        self.selected.clear();
    }

    /// Check if any record is selected.
    pub fn has_selected_record(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Check if the current record is selected.
    pub fn is_selected_record(&self) -> bool {
        match self.inner.fields() {
            Ok(current) => self.selected.iter().any(|selected| selected == current),
            Err(_) => false,
        }
    }

    /// Selected record snapshots, in selection order.
    pub fn selected_records(&self) -> &[Fields] {
        &self.selected
    }
}

impl<C: Cursor> CursorDecorator for SelectionCursor<C> {
    type Inner = C;

    fn inner(&self) -> &C {
        &self.inner
    }

    fn inner_mut(&mut self) -> &mut C {
        &mut self.inner
    }
}
