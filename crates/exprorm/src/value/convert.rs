//! Conversions from Rust types into [`Value`] and declared column kinds.

use super::{Value, ValueKind};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use uuid::Uuid;

/// A Rust type that maps onto a column.
///
/// Implemented for the scalar types the compiler understands and by
/// `#[derive(SqlEnum)]`. `#[derive(Entity)]` reads [`SqlType::KIND`] and
/// [`SqlType::NULLABLE`] to build column metadata and calls
/// [`SqlType::to_value`] to read field values off an instance.
pub trait SqlType {
    /// Declared kind of a column holding this type.
    const KIND: ValueKind;

    /// Whether the column accepts `NULL`.
    const NULLABLE: bool = false;

    /// Convert a field value for binding.
    fn to_value(&self) -> Value;
}

macro_rules! impl_scalar {
    ($($ty:ty => $kind:ident, |$v:ident| $conv:expr;)*) => {
        $(
            impl From<$ty> for Value {
                fn from($v: $ty) -> Self {
                    $conv
                }
            }

            impl SqlType for $ty {
                const KIND: ValueKind = ValueKind::$kind;

                fn to_value(&self) -> Value {
                    Value::from(self.clone())
                }
            }
        )*
    };
}

impl_scalar! {
    bool => Bool, |v| Value::Bool(v);
    i8 => Int, |v| Value::Int(i64::from(v));
    i16 => Int, |v| Value::Int(i64::from(v));
    i32 => Int, |v| Value::Int(i64::from(v));
    i64 => Int, |v| Value::Int(v);
    u8 => Int, |v| Value::Int(i64::from(v));
    u16 => Int, |v| Value::Int(i64::from(v));
    u32 => Int, |v| Value::Int(i64::from(v));
    f32 => Float, |v| Value::Float(f64::from(v));
    f64 => Float, |v| Value::Float(v);
    String => Text, |v| Value::Text(v);
    NaiveDate => Date, |v| Value::Date(v);
    NaiveTime => Time, |v| Value::Time(v);
    NaiveDateTime => DateTime, |v| Value::DateTime(v);
    DateTime<Utc> => Timestamp, |v| Value::Timestamp(v);
    Uuid => Uuid, |v| Value::Uuid(v);
    serde_json::Value => Json, |v| Value::Json(v);
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Text(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Lists are only meaningful as the right-hand side of `IN`.
impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::list(v)
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(v: [T; N]) -> Self {
        Value::list(v)
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Value {
    fn from(v: &[T]) -> Self {
        Value::list(v.iter().cloned())
    }
}

impl SqlType for Vec<u8> {
    const KIND: ValueKind = ValueKind::Bytes;

    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }
}

impl<T: SqlType> SqlType for Option<T> {
    const KIND: ValueKind = T::KIND;
    const NULLABLE: bool = true;

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}
