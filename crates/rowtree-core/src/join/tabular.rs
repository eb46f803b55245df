//! Tabular strategy: fields named `<alias><separator><field>`.
//!
//! This is the shape produced by `SELECT p.name AS p_T_name, ...`: every
//! table in the join contributes its columns under its own alias prefix, so
//! one flat row carries one slice per table.

use rowtree_proto::FlatRow;

use super::JoinNode;
use crate::arranged::Fields;
use crate::error::{Error, Result};

/// Tabular field selection for one join node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularJoin {
    prefix: String,
}

impl TabularJoin {
    /// Create the strategy for a table alias and field separator.
    pub fn new(alias: &str, field_separator: &str) -> Self {
        Self {
            prefix: format!("{alias}{field_separator}"),
        }
    }

    /// Extract this table's fields from a row.
    ///
    /// Returns `None` when the row carries no data for the table: every
    /// prefixed field is null (the unmatched side of an outer join), or the
    /// node does not require tabular fields and the row has none of them or
    /// lacks a key field.
    pub(crate) fn extract(&self, node: &JoinNode, row: &FlatRow) -> Result<Option<Fields>> {
        let fields: Fields = row
            .iter()
            .filter_map(|(name, value)| {
                name.strip_prefix(self.prefix.as_str())
                    .map(|field| (field.to_string(), value.clone()))
            })
            .collect();

        let config = node.config();
        if fields.is_empty() && config.require_all_tabular_fields {
            return Err(Error::MissingTableFields {
                table: node.table().to_string(),
            });
        }

        if fields.values().all(|value| value.is_null()) {
            return Ok(None);
        }

        if fields.contains_key(&config.joint_data_field) {
            return Err(Error::ReservedField {
                field: config.joint_data_field.clone(),
                table: node.table().to_string(),
            });
        }

        for key in node.key_fields() {
            let present = fields.get(key).is_some_and(|value| !value.is_null());
            if present {
                continue;
            }
            if config.require_all_tabular_fields {
                return Err(Error::MissingKey {
                    field: key.clone(),
                    table: node.table().to_string(),
                });
            }
            return Ok(None);
        }

        Ok(Some(fields))
    }
}
