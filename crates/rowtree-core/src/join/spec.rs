//! Declarative join tree descriptions.
//!
//! A join tree can be stored as JSON next to the query producing its rows:
//!
//! ```json
//! {
//!   "table": "p",
//!   "keys": ["id"],
//!   "joins": [
//!     { "id": "children", "node": { "table": "c", "keys": ["id"] } }
//!   ]
//! }
//! ```
//!
//! Configuration overrides are inherited by child nodes unless a child sets
//! its own.

use serde::Deserialize;

use super::JoinNode;
use crate::config::{JoinConfig, JoinMatching};
use crate::error::Result;

/// Strategy named in a join spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    Tabular,
    Columnar,
}

/// Serializable description of one join node and its children.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinSpec {
    #[serde(default)]
    pub strategy: StrategyKind,
    pub table: String,
    #[serde(default)]
    pub keys: Vec<String>,
    /// Value columns (columnar only).
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub id_separator: Option<String>,
    #[serde(default)]
    pub joint_data_field: Option<String>,
    #[serde(default)]
    pub field_separator: Option<String>,
    #[serde(default)]
    pub require_all_tabular_fields: Option<bool>,
    #[serde(default)]
    pub matching: Option<JoinMatching>,
    #[serde(default)]
    pub retain_key_fields: Option<bool>,
    #[serde(default)]
    pub joins: Vec<ChildSpec>,
}

/// A child join entry: the ID it is registered under and its node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChildSpec {
    pub id: String,
    pub node: JoinSpec,
}

impl JoinSpec {
    /// Parse a spec from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let spec = serde_json::from_str(text).map_err(rowtree_proto::Error::from)?;
        Ok(spec)
    }

    /// Build the join tree with default configuration at the root.
    pub fn build(&self) -> Result<JoinNode> {
        self.build_with(&JoinConfig::default())
    }

    /// Build the join tree, inheriting unset options from `inherited`.
    pub fn build_with(&self, inherited: &JoinConfig) -> Result<JoinNode> {
        let config = self.effective_config(inherited);

        let mut node = match self.strategy {
            StrategyKind::Tabular => {
                JoinNode::tabular_with_config(&self.table, &self.keys, config.clone())?
            }
            StrategyKind::Columnar => JoinNode::columnar_with_config(
                &self.table,
                &self.keys,
                &self.columns,
                config.clone(),
            )?,
        };

        for child in &self.joins {
            node.add_join(&child.id, child.node.build_with(&config)?)?;
        }
        Ok(node)
    }

    fn effective_config(&self, inherited: &JoinConfig) -> JoinConfig {
        let mut config = inherited.clone();
        if let Some(separator) = &self.id_separator {
            config.id_separator = separator.clone();
        }
        if let Some(field) = &self.joint_data_field {
            config.joint_data_field = field.clone();
        }
        if let Some(separator) = &self.field_separator {
            config.field_separator = separator.clone();
        }
        if let Some(require) = self.require_all_tabular_fields {
            config.require_all_tabular_fields = require;
        }
        if let Some(matching) = self.matching {
            config.matching = matching;
        }
        if let Some(retain) = self.retain_key_fields {
            config.retain_key_fields = retain;
        }
        config
    }
}
