//! The core record cursor.

use std::ops::Index;
use std::sync::Arc;

use indexmap::IndexMap;
use rowtree_proto::{FlatRow, Value};

use super::Cursor;
use crate::arranged::{ArrangedRecord, ArrangedSet, Fields};
use crate::error::{Error, Result};
use crate::join::JoinNode;

/// Cursor over the records of one join node.
///
/// The cursor and its children mirror the join tree: one child cursor per
/// registered child join, created with the parent and kept for its whole
/// lifetime. Record sets are shared through `Arc`, so moving a parent only
/// swaps pointers in its children.
#[derive(Debug, Clone)]
pub struct RecordCursor {
    join: Arc<JoinNode>,
    records: Arc<ArrangedSet>,
    position: usize,
    children: IndexMap<String, RecordCursor>,
}

impl RecordCursor {
    /// Build an empty cursor tree for a join tree.
    pub fn new(join: Arc<JoinNode>) -> Self {
        let children = join
            .joins()
            .iter()
            .map(|(join_id, node)| (join_id.to_string(), RecordCursor::new(Arc::clone(node))))
            .collect();

        Self {
            join,
            records: Arc::default(),
            position: 0,
            children,
        }
    }

    /// Build a cursor tree and populate it from flat rows.
    pub fn from_rows(join: Arc<JoinNode>, rows: &[FlatRow]) -> Result<Self> {
        let mut cursor = Self::new(join);
        cursor.populate(rows)?;
        Ok(cursor)
    }

    /// Join node this cursor materializes.
    pub fn join(&self) -> &Arc<JoinNode> {
        &self.join
    }

    /// The record set the cursor walks.
    pub fn records(&self) -> &Arc<ArrangedSet> {
        &self.records
    }

    /// Child cursor for a join, without moving anything.
    pub fn child_ref(&self, name: &str) -> Result<&RecordCursor> {
        let join_id = self.join.join_id(name)?;
        self.children.get(join_id).ok_or_else(|| Error::JoinNotFound {
            name: name.to_string(),
            table: self.join.table().to_string(),
        })
    }

    /// Render the cursor's whole record set as JSON.
    pub fn to_json(&self) -> serde_json::Value {
        self.join.export(&self.records)
    }

    /// Call `f` with the cursor positioned on each record in turn.
    ///
    /// The cursor is rewound first. `f` receives the cursor itself, so field
    /// access and child descent chain off the current record.
    pub fn visit<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&mut RecordCursor) -> Result<()>,
    {
        self.rewind();
        while self.is_valid() {
            f(self)?;
            self.advance();
        }
        Ok(())
    }

    /// Re-point every child cursor at the current record's child sets.
    /// A missing set, or no current record, leaves the child empty.
    fn sync_children(&mut self) {
        let current = self.records.get_index(self.position).map(|(_, record)| record);

        for (join_id, child) in self.children.iter_mut() {
            let set = current
                .and_then(|record| record.joint(join_id))
                .cloned()
                .unwrap_or_default();
            child.populate_arranged(set);
        }
    }
}

impl Cursor for RecordCursor {
    fn populate(&mut self, rows: &[FlatRow]) -> Result<()> {
        let records = self.join.arrange_flat_data(rows)?;
        self.populate_arranged(Arc::new(records));
        Ok(())
    }

    fn populate_arranged(&mut self, records: Arc<ArrangedSet>) {
        self.records = records;
        self.position = 0;
        self.sync_children();
    }

    fn key(&self) -> Option<&str> {
        self.records
            .get_index(self.position)
            .map(|(identity, _)| identity.as_str())
    }

    fn current(&self) -> Option<&ArrangedRecord> {
        self.records
            .get_index(self.position)
            .map(|(_, record)| record)
    }

    fn advance(&mut self) {
        if self.position < self.records.len() {
            self.position += 1;
        }
        self.sync_children();
    }

    fn rewind(&mut self) {
        self.position = 0;
        self.sync_children();
    }

    fn is_valid(&self) -> bool {
        self.position < self.records.len()
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn get(&self, field: &str) -> Result<&Value> {
        self.fields()?.get(field).ok_or_else(|| Error::FieldNotFound {
            field: field.to_string(),
        })
    }

    fn fields(&self) -> Result<&Fields> {
        self.current()
            .map(ArrangedRecord::fields)
            .ok_or(Error::NoCurrentRecord)
    }

    /// Child cursor for a join, addressed by a loosely-cased name.
    ///
    /// The child is already positioned on the current record's child set; its
    /// own position is kept until this cursor moves.
    fn child(&mut self, name: &str) -> Result<&mut RecordCursor> {
        let join_id = self.join.join_id(name)?;
        self.children
            .get_mut(join_id)
            .ok_or_else(|| Error::JoinNotFound {
                name: name.to_string(),
                table: self.join.table().to_string(),
            })
    }
}

impl Index<&str> for RecordCursor {
    type Output = Value;

    /// # Panics
    ///
    /// Panics if there is no current record or it has no such field; use
    /// [`Cursor::get`] for the fallible form.
    fn index(&self, field: &str) -> &Value {
        match self.get(field) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}
