//! Output formatters for materialized records.

use clap::ValueEnum;
use comfy_table::{Cell, Table};
use rowtree_core::proto::Value;
use rowtree_core::{ArrangedSet, JoinNode, RecordCursor};

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Nested JSON document
    Json,
    /// ASCII table of top-level records
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}

/// One step of a resolved join path: requested name, join ID, table.
pub type Resolution = (String, String, String);

/// Trait for formatting output.
pub trait Formatter {
    /// Format the record set a cursor walks.
    fn format_records(&self, cursor: &RecordCursor) -> String;

    /// Format a resolved join path.
    fn format_resolution(&self, steps: &[Resolution]) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Table => Box::new(TableFormatter),
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_records(&self, cursor: &RecordCursor) -> String {
        serde_json::to_string_pretty(&cursor.to_json()).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_resolution(&self, steps: &[Resolution]) -> String {
        let steps: Vec<_> = steps
            .iter()
            .map(|(name, join_id, table)| {
                serde_json::json!({"name": name, "join_id": join_id, "table": table})
            })
            .collect();
        serde_json::to_string_pretty(&steps).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_records(&self, cursor: &RecordCursor) -> String {
        if cursor.records().is_empty() {
            return "No records".to_string();
        }
        format_set_as_table(cursor.join(), cursor.records())
    }

    fn format_resolution(&self, steps: &[Resolution]) -> String {
        let mut table = Table::new();
        table.set_header(vec!["Name", "Join ID", "Table"]);

        for (name, join_id, target) in steps {
            table.add_row(vec![name, join_id, target]);
        }

        table.to_string()
    }
}

/// Format one record set: identity, plain fields, then a count per child join.
fn format_set_as_table(join: &JoinNode, records: &ArrangedSet) -> String {
    let mut columns: Vec<&str> = Vec::new();
    for record in records.values() {
        for name in record.fields().keys() {
            if !columns.contains(&name.as_str()) {
                columns.push(name);
            }
        }
    }
    let join_ids: Vec<&str> = join.joins().ids().collect();

    let mut table = Table::new();
    let mut headers: Vec<Cell> = vec![Cell::new("key")];
    headers.extend(columns.iter().map(Cell::new));
    headers.extend(join_ids.iter().map(|id| Cell::new(format!("{id} (count)"))));
    table.set_header(headers);

    for (identity, record) in records {
        let mut row: Vec<Cell> = vec![Cell::new(identity)];
        for column in &columns {
            let text = record.get(column).map(format_value).unwrap_or_default();
            row.push(Cell::new(text));
        }
        for join_id in &join_ids {
            let count = record.joint(join_id).map(|set| set.len()).unwrap_or(0);
            row.push(Cell::new(count));
        }
        table.add_row(row);
    }

    table.to_string()
}

/// Render a value for a table cell.
fn format_value(value: &Value) -> String {
    if value.is_null() {
        return "NULL".to_string();
    }
    if let Some(s) = value.as_str() {
        return s.to_string();
    }
    if let Some(b) = value.as_bool() {
        return b.to_string();
    }
    if let Some(i) = value.as_i64() {
        return i.to_string();
    }
    if let Some(f) = value.as_f64() {
        return f.to_string();
    }
    value.to_json().to_string()
}
