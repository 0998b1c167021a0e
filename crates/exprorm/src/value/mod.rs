//! Literal values carried through compilation.
//!
//! A [`Value`] is either bound as a parameter or rendered inline by the
//! dialect. [`ValueKind`] is the declared type of a column, used to coerce
//! literals compared against it.

mod convert;
#[cfg(feature = "postgres")]
mod pg;

pub use convert::SqlType;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// How an enum is stored in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EnumRepr {
    /// Stored as the variant name.
    Text,
    /// Stored as the variant ordinal.
    Int,
}

/// A single enum variant as a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EnumValue {
    /// Rust type name, for diagnostics.
    pub type_name: &'static str,
    /// Stored name of the variant.
    pub name: &'static str,
    /// Declaration ordinal (or explicit discriminant).
    pub ordinal: i64,
    /// Default storage representation.
    pub repr: EnumRepr,
}

/// Declared column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Text,
    Date,
    Time,
    DateTime,
    Timestamp,
    Uuid,
    Enum(EnumRepr),
    Bytes,
    Json,
}

impl ValueKind {
    /// Whether string functions and `LIKE` apply to this kind.
    pub fn is_text(self) -> bool {
        matches!(self, ValueKind::Text | ValueKind::Enum(EnumRepr::Text))
    }

    /// Whether arithmetic applies to this kind.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ValueKind::Int | ValueKind::Float | ValueKind::Enum(EnumRepr::Int)
        )
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    Enum(EnumValue),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
    /// Only valid as the right-hand side of `IN`.
    List(Vec<Value>),
}

impl Value {
    /// Build a list value from any iterator of convertible items.
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The kind of this value, `None` for `NULL` and lists.
    pub fn kind(&self) -> Option<ValueKind> {
        let kind = match self {
            Value::Null | Value::List(_) => return None,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
            Value::Date(_) => ValueKind::Date,
            Value::Time(_) => ValueKind::Time,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Timestamp(_) => ValueKind::Timestamp,
            Value::Uuid(_) => ValueKind::Uuid,
            Value::Enum(e) => ValueKind::Enum(e.repr),
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Json(_) => ValueKind::Json,
        };
        Some(kind)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Enum(e) => Some(e.name),
            _ => None,
        }
    }

    /// Adapt a literal to the declared kind of the column it is compared with.
    ///
    /// Only enum storage and integer/float widening are converted; anything
    /// else is passed through unchanged for the dialect to accept or reject.
    pub fn coerce_to(self, kind: ValueKind) -> Value {
        match (self, kind) {
            (Value::Enum(e), ValueKind::Enum(EnumRepr::Int) | ValueKind::Int) => {
                Value::Int(e.ordinal)
            }
            (Value::Enum(e), ValueKind::Enum(EnumRepr::Text) | ValueKind::Text) => {
                Value::Text(e.name.to_string())
            }
            (Value::Int(n), ValueKind::Float) => Value::Float(n as f64),
            (Value::List(items), kind) => {
                Value::List(items.into_iter().map(|v| v.coerce_to(kind)).collect())
            }
            (other, _) => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS_ACTIVE: EnumValue = EnumValue {
        type_name: "Status",
        name: "active",
        ordinal: 1,
        repr: EnumRepr::Text,
    };

    #[test]
    fn enum_coerces_to_column_repr() {
        let v = Value::Enum(STATUS_ACTIVE);
        assert_eq!(
            v.clone().coerce_to(ValueKind::Enum(EnumRepr::Int)),
            Value::Int(1)
        );
        assert_eq!(
            v.coerce_to(ValueKind::Enum(EnumRepr::Text)),
            Value::Text("active".to_string())
        );
    }

    #[test]
    fn list_coerces_elementwise() {
        let v = Value::List(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(
            v.coerce_to(ValueKind::Float),
            Value::List(vec![Value::Float(1.0), Value::Float(2.0)])
        );
    }

    #[test]
    fn kind_of_null_is_none() {
        assert_eq!(Value::Null.kind(), None);
        assert_eq!(Value::from("x").kind(), Some(ValueKind::Text));
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&vec![Value::Int(3), Value::Null, Value::from("a")])
            .unwrap();
        assert_eq!(json, r#"[3,null,"a"]"#);
    }
}
