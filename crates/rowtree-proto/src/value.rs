//! Scalar values carried by flat rows and arranged records.

use rkyv::{Archive, Deserialize, Serialize};

use crate::error::Error;

/// A scalar value as produced by the query layer.
///
/// Flat rows are denormalized join output, so every field is a scalar or
/// null. There are no array or nested variants: nesting is reconstructed by
/// the materialization engine, never carried inside a value.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub enum Value {
    /// Null value (e.g. the unmatched side of an outer join).
    Null,
    /// Boolean value.
    Bool(bool),
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// 32-bit floating point.
    Float32(f32),
    /// 64-bit floating point.
    Float64(f64),
    /// UTF-8 string.
    String(String),
    /// Binary data.
    Bytes(Vec<u8>),
    /// Timestamp as microseconds since Unix epoch.
    Timestamp(i64),
    /// UUID as 16 bytes.
    Uuid([u8; 16]),
}

impl Value {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(i) => Some(*i),
            Value::Int32(i) => Some(*i as i64),
            _ => None,
        }
    }

    /// Try to get as f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(f) => Some(*f),
            Value::Float32(f) => Some(*f as f64),
            _ => None,
        }
    }

    /// Try to get as string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render this value as one fragment of a row identity.
    ///
    /// Fragments of a composite key are joined with the node's ID separator,
    /// so `5` and `6` under keys `[k1, k2]` become `"5_6"`.
    pub fn key_fragment(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => String::from(if *b { "1" } else { "0" }),
            Value::Int32(i) => i.to_string(),
            Value::Int64(i) => i.to_string(),
            Value::Float32(f) => f.to_string(),
            Value::Float64(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::Bytes(b) => hex::encode(b),
            Value::Timestamp(t) => t.to_string(),
            Value::Uuid(u) => hex::encode(u),
        }
    }

    /// Convert a JSON scalar into a value.
    ///
    /// Integers become `Int64`, other numbers `Float64`. Arrays and objects
    /// are rejected: flat rows only carry scalars.
    pub fn from_json(field: &str, json: &serde_json::Value) -> Result<Self, Error> {
        match json {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int64(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::Float64(f))
                } else {
                    Err(Error::UnsupportedValue {
                        field: field.to_string(),
                        found: n.to_string(),
                    })
                }
            }
            serde_json::Value::String(s) => Ok(Value::String(s.clone())),
            other => Err(Error::UnsupportedValue {
                field: field.to_string(),
                found: other.to_string(),
            }),
        }
    }

    /// Convert this value into its natural JSON scalar.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int32(i) => serde_json::Value::from(*i),
            Value::Int64(i) | Value::Timestamp(i) => serde_json::Value::from(*i),
            Value::Float32(f) => float_to_json(*f as f64),
            Value::Float64(f) => float_to_json(*f),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Bytes(b) => serde_json::Value::String(hex::encode(b)),
            Value::Uuid(u) => serde_json::Value::String(hex::encode(u)),
        }
    }
}

fn float_to_json(f: f64) -> serde_json::Value {
    serde_json::Number::from_f64(f)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

// Conversion implementations
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<[u8; 16]> for Value {
    fn from(v: [u8; 16]) -> Self {
        Value::Uuid(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessors() {
        assert!(Value::Null.is_null());
        assert!(!Value::Int64(0).is_null());

        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int32(42).as_i64(), Some(42)); // Widening conversion
        assert_eq!(Value::Float32(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::String("hello".into()).as_str(), Some("hello"));
        assert_eq!(Value::Int64(1).as_str(), None);
    }

    #[test]
    fn test_key_fragments() {
        assert_eq!(Value::Int64(10).key_fragment(), "10");
        assert_eq!(Value::Int32(-3).key_fragment(), "-3");
        assert_eq!(Value::String("abc".into()).key_fragment(), "abc");
        assert_eq!(Value::Bool(true).key_fragment(), "1");
        assert_eq!(Value::Bool(false).key_fragment(), "0");
        assert_eq!(Value::Null.key_fragment(), "");
        assert_eq!(Value::Bytes(vec![0xde, 0xad]).key_fragment(), "dead");
        assert_eq!(Value::Float64(2.5).key_fragment(), "2.5");
    }

    #[test]
    fn test_from_json_scalars() {
        let v = Value::from_json("f", &serde_json::json!(7)).unwrap();
        assert_eq!(v, Value::Int64(7));

        let v = Value::from_json("f", &serde_json::json!(1.25)).unwrap();
        assert_eq!(v, Value::Float64(1.25));

        let v = Value::from_json("f", &serde_json::json!(null)).unwrap();
        assert!(v.is_null());

        let v = Value::from_json("f", &serde_json::json!("x")).unwrap();
        assert_eq!(v, Value::String("x".into()));
    }

    #[test]
    fn test_from_json_rejects_nested() {
        let err = Value::from_json("tags", &serde_json::json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::UnsupportedValue { ref field, .. } if field == "tags"));

        assert!(Value::from_json("meta", &serde_json::json!({"a": 1})).is_err());
    }

    #[test]
    fn test_to_json() {
        assert_eq!(Value::Int32(4).to_json(), serde_json::json!(4));
        assert_eq!(Value::Null.to_json(), serde_json::Value::Null);
        assert_eq!(Value::Uuid([0u8; 16]).to_json(), serde_json::json!("0".repeat(32)));
        assert_eq!(Value::Float64(f64::NAN).to_json(), serde_json::Value::Null);
    }

    #[test]
    fn test_value_conversions() {
        let v: Value = "hello".into();
        assert_eq!(v, Value::String("hello".into()));

        let v: Value = None::<i64>.into();
        assert_eq!(v, Value::Null);

        let v: Value = Some(42i64).into();
        assert_eq!(v, Value::Int64(42));
    }

    #[test]
    fn test_value_serialization_roundtrip() {
        let value = Value::Uuid([7u8; 16]);
        let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&value).unwrap();
        let archived = rkyv::access::<ArchivedValue, rkyv::rancor::Error>(&bytes).unwrap();
        let deserialized: Value =
            rkyv::deserialize::<Value, rkyv::rancor::Error>(archived).unwrap();
        assert_eq!(value, deserialized);
    }
}
