//! Record cursors over arranged record sets.
//!
//! A [`RecordCursor`] walks the records of one join node and exposes, for
//! its current record, the child cursors of every registered child join.
//! Child cursors are built once with the tree and re-pointed at the current
//! record's child sets whenever the parent moves, so a nested traversal
//! always reflects the parent's position.
//!
//! Consumers depend on the [`Cursor`] capability set only. Cross-cutting
//! extensions wrap a cursor through [`CursorDecorator`], which forwards the
//! whole capability set; [`SelectionCursor`] is one such extension.

mod decorator;
mod record;
mod selection;

use std::sync::Arc;

use rowtree_proto::{FlatRow, Value};

use crate::arranged::{ArrangedRecord, ArrangedSet, Fields};
use crate::error::Result;

pub use decorator::CursorDecorator;
pub use record::RecordCursor;
pub use selection::SelectionCursor;

/// Capability set of a record cursor.
///
/// Records are read-only: there is no way to write a field through a
/// cursor. Field access always refers to the current record's plain fields.
pub trait Cursor {
    /// Materialize flat rows with the cursor's join node and point the
    /// cursor at the first resulting record.
    fn populate(&mut self, rows: &[FlatRow]) -> Result<()>;

    /// Point the cursor at an already materialized record set.
    fn populate_arranged(&mut self, records: Arc<ArrangedSet>);

    /// Identity of the current record.
    fn key(&self) -> Option<&str>;

    /// The current record.
    fn current(&self) -> Option<&ArrangedRecord>;

    /// Move to the next record.
    fn advance(&mut self);

    /// Move back to the first record.
    fn rewind(&mut self);

    /// Check if the cursor is positioned on a record.
    fn is_valid(&self) -> bool;

    /// Number of records in the cursor's set.
    fn len(&self) -> usize;

    /// Check if the cursor's set has no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read a plain field of the current record.
    fn get(&self, field: &str) -> Result<&Value>;

    /// Plain fields of the current record.
    fn fields(&self) -> Result<&Fields>;

    /// Child cursor for a join, addressed by a loosely-cased name.
    fn child(&mut self, name: &str) -> Result<&mut RecordCursor>;
}
