//! Command implementations.

use std::path::Path;
use std::sync::Arc;

use rowtree_core::proto::{rows_from_json, FlatRow};
use rowtree_core::{Cursor, JoinNode, JoinSpec, RecordCursor};
use tracing::{debug, info};

use crate::error::CliError;
use crate::formatter::{create_formatter, OutputFormat, Resolution};

/// Materialize the rows in `rows_path` with the join tree in `join_path`.
pub fn arrange(join_path: &Path, rows_path: &Path, format: OutputFormat) -> Result<String, CliError> {
    let tree = load_tree(join_path)?;
    let rows = load_rows(rows_path)?;

    let cursor = RecordCursor::from_rows(Arc::new(tree), &rows)?;
    info!(rows = rows.len(), records = cursor.len(), "Materialized rows");

    Ok(create_formatter(format).format_records(&cursor))
}

/// Resolve a dot-separated path of join names against the join tree.
pub fn resolve(join_path: &Path, path: &str, format: OutputFormat) -> Result<String, CliError> {
    let tree = load_tree(join_path)?;

    let mut node: &JoinNode = &tree;
    let mut steps: Vec<Resolution> = Vec::new();
    for name in path.split('.') {
        let join_id = node.join_id(name)?.to_string();
        node = node.join(name)?.as_ref();
        debug!(name, join_id = %join_id, table = node.table(), "Resolved join");
        steps.push((name.to_string(), join_id, node.table().to_string()));
    }

    Ok(create_formatter(format).format_resolution(&steps))
}

/// Load and build a join tree from a JSON spec file.
pub fn load_tree(path: &Path) -> Result<JoinNode, CliError> {
    let spec: JoinSpec = serde_json::from_str(&read(path)?).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(spec.build()?)
}

/// Load flat rows from a JSON array of objects.
pub fn load_rows(path: &Path) -> Result<Vec<FlatRow>, CliError> {
    let json: serde_json::Value =
        serde_json::from_str(&read(path)?).map_err(|source| CliError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(rows_from_json(&json)?)
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}
