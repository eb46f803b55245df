//! Join trees and flat-row materialization.
//!
//! A [`JoinNode`] describes one table's role in a join query: the fields
//! that identify its rows and the child joins hanging off it. Two strategies
//! decide which fields of a flat row belong to the node:
//! - Tabular: fields prefixed with `<alias><separator>`
//! - Columnar: key and value columns named directly
//!
//! Materialization walks the tree once per row, threading an explicit
//! accumulator so that repeated parent rows collapse into one record whose
//! child sets grow across the whole input.

mod columnar;
mod name;
mod registry;
mod spec;
mod tabular;

use std::collections::HashSet;
use std::sync::Arc;

use rowtree_proto::FlatRow;
use tracing::{debug, instrument, trace};

use crate::arranged::{fields_to_json, ArrangedRecord, ArrangedSet, Fields};
use crate::config::{JoinConfig, JoinMatching};
use crate::error::{Error, Result};

pub use columnar::ColumnarJoin;
pub use name::canonical_name;
pub use registry::JoinRegistry;
pub use spec::{ChildSpec, JoinSpec, StrategyKind};
pub use tabular::TabularJoin;

/// Field selection strategy of a join node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinStrategy {
    /// Prefix-based selection (`<alias><separator><field>`).
    Tabular(TabularJoin),
    /// Direct column selection.
    Columnar(ColumnarJoin),
}

/// One node of a declarative join tree.
#[derive(Debug, Clone)]
pub struct JoinNode {
    table: String,
    key_fields: Vec<String>,
    config: JoinConfig,
    strategy: JoinStrategy,
    joins: JoinRegistry,
}

impl JoinNode {
    /// Create a tabular node with default configuration.
    pub fn tabular<I, K>(alias: impl Into<String>, key_fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self::tabular_with_config(alias, key_fields, JoinConfig::default())
    }

    /// Create a tabular node.
    pub fn tabular_with_config<I, K>(
        alias: impl Into<String>,
        key_fields: I,
        config: JoinConfig,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let alias = alias.into();
        let strategy = JoinStrategy::Tabular(TabularJoin::new(&alias, &config.field_separator));
        Self::new(alias, collect_names(key_fields), config, strategy)
    }

    /// Create a columnar node with default configuration.
    pub fn columnar<I, K, C, V>(table: impl Into<String>, key_fields: I, columns: C) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
        C: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::columnar_with_config(table, key_fields, columns, JoinConfig::default())
    }

    /// Create a columnar node.
    pub fn columnar_with_config<I, K, C, V>(
        table: impl Into<String>,
        key_fields: I,
        columns: C,
        config: JoinConfig,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
        C: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let columns = collect_names(columns);
        check_names("column", &columns, &config)?;
        let strategy = JoinStrategy::Columnar(ColumnarJoin::new(columns));
        Self::new(table.into(), collect_names(key_fields), config, strategy)
    }

    fn new(
        table: String,
        key_fields: Vec<String>,
        config: JoinConfig,
        strategy: JoinStrategy,
    ) -> Result<Self> {
        if table.is_empty() {
            return Err(Error::InvalidDeclaration(
                "table name must not be empty".to_string(),
            ));
        }
        config.validate()?;
        check_names("key field", &key_fields, &config)?;

        Ok(Self {
            joins: JoinRegistry::new(config.matching),
            table,
            key_fields,
            config,
            strategy,
        })
    }

    /// Register a child join under `join_id`.
    pub fn add_join(&mut self, join_id: impl Into<String>, node: JoinNode) -> Result<&mut Self> {
        self.joins
            .register(&self.table, join_id.into(), Arc::new(node))?;
        Ok(self)
    }

    /// Register a child join, builder style.
    pub fn with_join(mut self, join_id: impl Into<String>, node: JoinNode) -> Result<Self> {
        self.add_join(join_id, node)?;
        Ok(self)
    }

    /// Change how child join names are matched.
    pub fn set_matching(&mut self, matching: JoinMatching) -> Result<()> {
        self.joins.set_matching(matching)?;
        self.config.matching = self.joins.matching();
        Ok(())
    }

    /// Table alias (tabular) or table name (columnar).
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Fields whose values form a row's identity.
    pub fn key_fields(&self) -> &[String] {
        &self.key_fields
    }

    /// Node configuration.
    pub fn config(&self) -> &JoinConfig {
        &self.config
    }

    /// Field selection strategy.
    pub fn strategy(&self) -> &JoinStrategy {
        &self.strategy
    }

    /// Child join registry.
    pub fn joins(&self) -> &JoinRegistry {
        &self.joins
    }

    /// Resolve a requested child name to its registered join ID.
    pub fn join_id(&self, name: &str) -> Result<&str> {
        self.joins.resolve(&self.table, name)
    }

    /// Resolve a requested child name to the child node.
    pub fn join(&self, name: &str) -> Result<&Arc<JoinNode>> {
        let join_id = self.join_id(name)?;
        self.joins.get(join_id).ok_or_else(|| Error::JoinNotFound {
            name: name.to_string(),
            table: self.table.clone(),
        })
    }

    /// Materialize flat rows into a deduplicated record set.
    #[instrument(skip_all, fields(table = %self.table))]
    pub fn arrange_flat_data(&self, rows: &[FlatRow]) -> Result<ArrangedSet> {
        let arranged = self.arrange_into(rows, ArrangedSet::new())?;
        debug!(
            table = %self.table,
            rows = rows.len(),
            records = arranged.len(),
            "Arranged flat rows"
        );
        Ok(arranged)
    }

    /// Materialize flat rows on top of an existing accumulator.
    ///
    /// Records already in `arranged` keep their position; rows matching an
    /// existing identity extend that record's child sets.
    pub fn arrange_into(&self, rows: &[FlatRow], mut arranged: ArrangedSet) -> Result<ArrangedSet> {
        for row in rows {
            self.arrange_row(row, &mut arranged)?;
        }
        Ok(arranged)
    }

    fn arrange_row(&self, row: &FlatRow, arranged: &mut ArrangedSet) -> Result<()> {
        let extracted = match &self.strategy {
            JoinStrategy::Tabular(tabular) => tabular.extract(self, row)?,
            JoinStrategy::Columnar(columnar) => columnar.extract(self, row)?,
        };
        let Some(mut fields) = extracted else {
            trace!(table = %self.table, "No data for branch");
            return Ok(());
        };

        let identity = self.row_identity(&fields, arranged.len());
        if !self.config.retain_key_fields {
            fields.retain(|name, _| !self.key_fields.contains(name));
        }

        let record = arranged
            .entry(identity)
            .or_insert_with(|| ArrangedRecord::with_joins(fields, self.joins.ids()));

        for (join_id, child) in self.joins.iter() {
            child.arrange_row(row, record.joint_mut(join_id))?;
        }
        Ok(())
    }

    /// Identity of a row at this node: key values joined by the ID
    /// separator, or the next ordinal when the node has no keys.
    fn row_identity(&self, fields: &Fields, ordinal: usize) -> String {
        if self.key_fields.is_empty() {
            return ordinal.to_string();
        }

        self.key_fields
            .iter()
            .map(|key| fields.get(key).map(|v| v.key_fragment()).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(&self.config.id_separator)
    }

    /// Render an arranged set of this node as JSON.
    ///
    /// Each record's child sets appear under the node's joint-data field,
    /// rendered recursively by the child nodes.
    pub fn export(&self, arranged: &ArrangedSet) -> serde_json::Value {
        let records = arranged
            .iter()
            .map(|(identity, record)| (identity.clone(), self.export_record(record)))
            .collect();
        serde_json::Value::Object(records)
    }

    fn export_record(&self, record: &ArrangedRecord) -> serde_json::Value {
        let mut object = fields_to_json(record.fields());

        if !self.joins.is_empty() {
            let joint = self
                .joins
                .iter()
                .map(|(join_id, child)| {
                    let set = match record.joint(join_id) {
                        Some(set) => child.export(set),
                        None => serde_json::Value::Object(serde_json::Map::new()),
                    };
                    (join_id.to_string(), set)
                })
                .collect();
            object.insert(
                self.config.joint_data_field.clone(),
                serde_json::Value::Object(joint),
            );
        }

        serde_json::Value::Object(object)
    }
}

fn collect_names<I, K>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = K>,
    K: Into<String>,
{
    names.into_iter().map(Into::into).collect()
}

fn check_names(kind: &str, names: &[String], config: &JoinConfig) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if name.is_empty() {
            return Err(Error::InvalidDeclaration(format!("{kind} name must not be empty")));
        }
        if *name == config.joint_data_field {
            return Err(Error::InvalidDeclaration(format!(
                "{kind} '{name}' collides with the joint data field"
            )));
        }
        if !seen.insert(name.as_str()) {
            return Err(Error::InvalidDeclaration(format!("duplicate {kind} '{name}'")));
        }
    }
    Ok(())
}
