//! Columnar strategy: identity and value columns named directly.

use rowtree_proto::FlatRow;

use super::JoinNode;
use crate::arranged::Fields;
use crate::error::Result;

/// Columnar field selection for one join node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnarJoin {
    columns: Vec<String>,
}

impl ColumnarJoin {
    /// Create the strategy for the given value columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Declared value columns.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Extract this node's key and value columns from a row, in row order.
    ///
    /// A row has data for the node when every key column is non-null; a node
    /// without keys has data when any declared column is non-null.
    pub(crate) fn extract(&self, node: &JoinNode, row: &FlatRow) -> Result<Option<Fields>> {
        let keys = node.key_fields();
        let has_data = if keys.is_empty() {
            self.columns
                .iter()
                .any(|column| row.get(column).is_some_and(|value| !value.is_null()))
        } else {
            keys.iter()
                .all(|key| row.get(key).is_some_and(|value| !value.is_null()))
        };

        if !has_data {
            return Ok(None);
        }

        let fields = row
            .iter()
            .filter(|(name, _)| keys.contains(*name) || self.columns.contains(*name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        Ok(Some(fields))
    }
}
