//! Forwarding base for cursor extensions.

use std::sync::Arc;

use rowtree_proto::{FlatRow, Value};

use super::{Cursor, RecordCursor};
use crate::arranged::{ArrangedRecord, ArrangedSet, Fields};
use crate::error::Result;

/// A type wrapping one cursor.
///
/// Every decorator is itself a [`Cursor`]: the whole capability set is
/// forwarded unchanged to the wrapped cursor, so an extension only adds its
/// own state and methods on top.
pub trait CursorDecorator {
    /// The wrapped cursor type.
    type Inner: Cursor;

    /// The wrapped cursor.
    fn inner(&self) -> &Self::Inner;

    /// The wrapped cursor, mutably.
    fn inner_mut(&mut self) -> &mut Self::Inner;
}

impl<D: CursorDecorator> Cursor for D {
    fn populate(&mut self, rows: &[FlatRow]) -> Result<()> {
        self.inner_mut().populate(rows)
    }

    fn populate_arranged(&mut self, records: Arc<ArrangedSet>) {
        self.inner_mut().populate_arranged(records)
    }

    fn key(&self) -> Option<&str> {
        self.inner().key()
    }

    fn current(&self) -> Option<&ArrangedRecord> {
        self.inner().current()
    }

    fn advance(&mut self) {
        self.inner_mut().advance()
    }

    fn rewind(&mut self) {
        self.inner_mut().rewind()
    }

    fn is_valid(&self) -> bool {
        self.inner().is_valid()
    }

    fn len(&self) -> usize {
        self.inner().len()
    }

    fn is_empty(&self) -> bool {
        self.inner().is_empty()
    }

    fn get(&self, field: &str) -> Result<&Value> {
        self.inner().get(field)
    }

    fn fields(&self) -> Result<&Fields> {
        self.inner().fields()
    }

    fn child(&mut self, name: &str) -> Result<&mut RecordCursor> {
        self.inner_mut().child(name)
    }
}
