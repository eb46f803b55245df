//! rowtree boundary types.
//!
//! This crate defines the data exchanged between the query layer, the
//! materialization engine and its consumers.
//!
//! # Modules
//!
//! - [`value`] - Scalar values carried by rows and records
//! - [`row`] - Flat rows and their JSON form
//! - [`error`] - Conversion error types
//!
//! # Serialization
//!
//! [`Value`] derives `rkyv::Archive`, `rkyv::Serialize` and
//! `rkyv::Deserialize` so rows can travel over the same wire format as the
//! rest of the stack. JSON conversion is provided for files and diagnostics.

pub mod error;
pub mod row;
pub mod value;

pub use error::Error;

// Re-export commonly used types at crate root
pub use row::{flat_row, row_from_json, row_to_json, rows_from_json, FlatRow};
pub use value::Value;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_roundtrip_through_json() {
        let row = flat_row([
            ("p_T_id", Value::Int64(1)),
            ("p_T_name", Value::String("A".into())),
            ("c_T_id", Value::Null),
        ]);

        let json = row_to_json(&row);
        let parsed = row_from_json(0, &json).unwrap();
        assert_eq!(row, parsed);
    }
}
