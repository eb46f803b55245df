//! Join node configuration.

use serde::Deserialize;

use crate::error::{Error, Result};

/// Default separator between composite key fragments.
pub const DEFAULT_ID_SEPARATOR: &str = "_";

/// Default name of the joint-data entry in arranged records.
pub const DEFAULT_JOINT_DATA_FIELD: &str = "joint_data";

/// Default separator between a table alias and a field name.
pub const DEFAULT_FIELD_SEPARATOR: &str = "_T_";

/// How a requested join name is matched against registered join IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinMatching {
    /// Exact match first, then canonical (case- and punctuation-insensitive) match.
    #[default]
    Fuzzy,
    /// Byte-identical match only.
    ExactOnly,
}

/// Configuration shared by both join strategies.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinConfig {
    /// Separator joining the fragments of a composite row identity.
    pub id_separator: String,

    /// Name under which child record sets appear in exported records.
    /// No data field may use this name.
    pub joint_data_field: String,

    /// Separator between table alias and field name (tabular only).
    pub field_separator: String,

    /// Whether a row with data but without every key field is an error
    /// (tabular only). When unset such rows are skipped for the branch.
    pub require_all_tabular_fields: bool,

    /// Join name matching mode.
    pub matching: JoinMatching,

    /// Keep key fields among a record's plain fields.
    pub retain_key_fields: bool,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            id_separator: DEFAULT_ID_SEPARATOR.to_string(),
            joint_data_field: DEFAULT_JOINT_DATA_FIELD.to_string(),
            field_separator: DEFAULT_FIELD_SEPARATOR.to_string(),
            require_all_tabular_fields: false,
            matching: JoinMatching::Fuzzy,
            retain_key_fields: false,
        }
    }
}

impl JoinConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a strict configuration: exact-only matching, required tabular fields.
    pub fn strict() -> Self {
        Self {
            require_all_tabular_fields: true,
            matching: JoinMatching::ExactOnly,
            ..Default::default()
        }
    }

    /// Set the identity separator.
    pub fn with_id_separator(mut self, separator: impl Into<String>) -> Self {
        self.id_separator = separator.into();
        self
    }

    /// Set the joint-data field name.
    pub fn with_joint_data_field(mut self, field: impl Into<String>) -> Self {
        self.joint_data_field = field.into();
        self
    }

    /// Set the alias/field separator.
    pub fn with_field_separator(mut self, separator: impl Into<String>) -> Self {
        self.field_separator = separator.into();
        self
    }

    /// Set whether tabular key fields are required.
    pub fn with_require_all_tabular_fields(mut self, require: bool) -> Self {
        self.require_all_tabular_fields = require;
        self
    }

    /// Set the join name matching mode.
    pub fn with_matching(mut self, matching: JoinMatching) -> Self {
        self.matching = matching;
        self
    }

    /// Set whether key fields stay among plain fields.
    pub fn with_retain_key_fields(mut self, retain: bool) -> Self {
        self.retain_key_fields = retain;
        self
    }

    /// Check that separators and names are usable.
    pub fn validate(&self) -> Result<()> {
        if self.id_separator.is_empty() {
            return Err(Error::InvalidDeclaration(
                "id separator must not be empty".to_string(),
            ));
        }
        if self.field_separator.is_empty() {
            return Err(Error::InvalidDeclaration(
                "field separator must not be empty".to_string(),
            ));
        }
        if self.joint_data_field.is_empty() {
            return Err(Error::InvalidDeclaration(
                "joint data field name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
