//! Flat rows: one denormalized record from a join query.

use indexmap::IndexMap;

use crate::error::Error;
use crate::value::Value;

/// An ordered mapping of field name to value.
///
/// Field order is the column order of the producing query and is preserved
/// through materialization.
pub type FlatRow = IndexMap<String, Value>;

/// Build a flat row from `(field, value)` pairs.
pub fn flat_row<K, V, I>(fields: I) -> FlatRow
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    fields
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Convert one JSON object into a flat row.
pub fn row_from_json(index: usize, json: &serde_json::Value) -> Result<FlatRow, Error> {
    let object = json.as_object().ok_or(Error::InvalidRow { index })?;

    object
        .iter()
        .map(|(field, value)| Ok((field.clone(), Value::from_json(field, value)?)))
        .collect()
}

/// Parse a JSON array of objects into flat rows.
pub fn rows_from_json(json: &serde_json::Value) -> Result<Vec<FlatRow>, Error> {
    let rows = json
        .as_array()
        .ok_or_else(|| Error::InvalidDocument("expected an array of rows".to_string()))?;

    rows.iter()
        .enumerate()
        .map(|(index, row)| row_from_json(index, row))
        .collect()
}

/// Render a flat row as a JSON object, preserving field order.
pub fn row_to_json(row: &FlatRow) -> serde_json::Value {
    let object: serde_json::Map<String, serde_json::Value> = row
        .iter()
        .map(|(field, value)| (field.clone(), value.to_json()))
        .collect();
    serde_json::Value::Object(object)
}
