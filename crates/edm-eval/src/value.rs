//! Runtime values computed from model-level expressions.

use indexmap::IndexMap;
use num_bigint::BigInt;
use serde::Serialize;
use std::fmt::{self, Display};

/// An ordered record: construction order is preserved and observable.
pub type Record = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Exact decimal: `digits * 10^-scale`.
    Decimal { digits: BigInt, scale: u32 },
    Str(String),
    Record(Record),
    Collection(Vec<Value>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Decimal,
    Str,
    Record,
    Collection,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Decimal { .. } => ValueKind::Decimal,
            Value::Str(_) => ValueKind::Str,
            Value::Record(_) => ValueKind::Record,
            Value::Collection(_) => ValueKind::Collection,
        }
    }

    pub fn record(fields: impl IntoIterator<Item = (String, Value)>) -> Self {
        Value::Record(fields.into_iter().collect())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "boolean",
            ValueKind::Int => "integer",
            ValueKind::Float => "float",
            ValueKind::Decimal => "decimal",
            ValueKind::Str => "string",
            ValueKind::Record => "record",
            ValueKind::Collection => "collection",
        };
        write!(f, "{text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_preserves_order() {
        let value = Value::record([
            ("z".to_string(), Value::Int(1)),
            ("a".to_string(), Value::Int(2)),
        ]);
        let Value::Record(record) = &value else { unreachable!() };
        let keys: Vec<_> = record.keys().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn test_kind() {
        assert_eq!(Value::Null.kind(), ValueKind::Null);
        assert_eq!(Value::Collection(vec![]).kind(), ValueKind::Collection);
    }

    #[test]
    fn test_decimal_is_exact() {
        // 123.45 and 123.450 are distinct values, not float-equal.
        let short = Value::Decimal {
            digits: BigInt::from(12345),
            scale: 2,
        };
        let long = Value::Decimal {
            digits: BigInt::from(123450),
            scale: 3,
        };
        assert_eq!(short.kind(), ValueKind::Decimal);
        assert_ne!(short, long);
        assert_eq!(
            short,
            Value::Decimal {
                digits: BigInt::from(12345),
                scale: 2
            }
        );
    }

    #[test]
    fn test_values_serialize_to_json() {
        let value = Value::record([
            ("Name".to_string(), Value::Str("widget".to_string())),
            (
                "Price".to_string(),
                Value::Decimal {
                    digits: BigInt::from(999),
                    scale: 2,
                },
            ),
        ]);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["Record"]["Name"]["Str"], "widget");
        assert!(!json["Record"]["Price"]["Decimal"].is_null());
    }
}
