//! Arranged records: the deduplicated, nested output of materialization.

use std::sync::Arc;

use indexmap::IndexMap;
use rowtree_proto::Value;

/// Plain fields of one record, in first-seen column order.
pub type Fields = IndexMap<String, Value>;

/// Records of one join node keyed by row identity, in first-seen order.
pub type ArrangedSet = IndexMap<String, ArrangedRecord>;

/// One deduplicated record and the record sets of its child joins.
///
/// Child sets are reference counted so cursors can be re-pointed at a slice
/// of the tree without copying it. Once materialization returns, the
/// structure is never mutated and may be shared between cursor trees.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrangedRecord {
    fields: Fields,
    joint_data: IndexMap<String, Arc<ArrangedSet>>,
}

impl ArrangedRecord {
    /// Create a record without child joins.
    pub fn new(fields: Fields) -> Self {
        Self {
            fields,
            joint_data: IndexMap::new(),
        }
    }

    /// Create a record with an empty set for each of the given child joins.
    pub(crate) fn with_joins<'a>(fields: Fields, join_ids: impl Iterator<Item = &'a str>) -> Self {
        let joint_data = join_ids
            .map(|id| (id.to_string(), Arc::new(ArrangedSet::new())))
            .collect();
        Self { fields, joint_data }
    }

    /// Plain fields, excluding joint data.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Get one plain field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Child record set for a join.
    ///
    /// `Some` with an empty set means the join was attempted and contributed
    /// no rows for this record; `None` means the join is not one of this
    /// node's children.
    pub fn joint(&self, join_id: &str) -> Option<&Arc<ArrangedSet>> {
        self.joint_data.get(join_id)
    }

    /// All child record sets keyed by join ID.
    pub fn joint_data(&self) -> &IndexMap<String, Arc<ArrangedSet>> {
        &self.joint_data
    }

    /// Mutable accumulator for a child join during materialization.
    pub(crate) fn joint_mut(&mut self, join_id: &str) -> &mut ArrangedSet {
        let set = self.joint_data.entry(join_id.to_string()).or_default();
        Arc::make_mut(set)
    }
}

/// Render plain fields as a JSON object.
pub(crate) fn fields_to_json(fields: &Fields) -> serde_json::Map<String, serde_json::Value> {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), value.to_json()))
        .collect()
}
