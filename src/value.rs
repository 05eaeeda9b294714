//! Dynamically typed values for captured error fields.
//!
//! Error fields hold whatever the error type stores: numbers, strings, flags,
//! nested structures. A [`Value`] keeps that heterogeneity while staying a
//! closed set of variants, so the serializer decides the wire representation
//! and nothing in a report is an opaque blob.
//!
//! # Examples
//!
//! ```
//! use squash_backtrace::value::Value;
//!
//! assert_eq!(Value::from(42u8), Value::Integer(42));
//! assert_eq!(Value::from("disk full"), Value::String("disk full".into()));
//! assert_eq!(Value::from(None::<bool>), Value::Null);
//! ```

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::Serialize;

/// A dynamically typed field value.
///
/// Serializes untagged: `Null` becomes `null`, `List` becomes an array,
/// `Object` becomes a map, and every scalar becomes the matching scalar.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Integer(i64),
    /// An unsigned integer too large to be represented as [`Value::Integer`].
    Unsigned(u64),
    /// A floating point number.
    Float(f64),
    /// A string.
    String(String),
    /// An ordered sequence of values.
    List(Vec<Value>),
    /// A nested object, keyed by field name.
    Object(IndexMap<String, Value>),
}

impl Value {
    /// Returns `true` if this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the string slice if this is a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

macro_rules! impl_from_lossless_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Integer(i64::from(value))
                }
            }
        )*
    };
}

impl_from_lossless_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(value) => Value::Integer(value),
            Err(_) => Value::Unsigned(value),
        }
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::from(value as u64)
    }
}

impl From<isize> for Value {
    fn from(value: isize) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::String(value.to_string())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(value: Cow<'_, str>) -> Self {
        Value::String(value.into_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(object: IndexMap<String, Value>) -> Self {
        Value::Object(object)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Object(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_large_unsigned_is_not_truncated() {
        assert_eq!(Value::from(7u64), Value::Integer(7));
        assert_eq!(Value::from(u64::MAX), Value::Unsigned(u64::MAX));
    }

    #[test]
    fn test_serializes_untagged() {
        let object: Value = [("retries", Value::from(3)), ("host", Value::from("db-1"))]
            .into_iter()
            .collect();
        let list = Value::from(vec![Value::Null, Value::Bool(true), Value::Float(0.5)]);

        assert_eq!(
            serde_json::to_string(&object).unwrap(),
            r#"{"retries":3,"host":"db-1"}"#
        );
        assert_eq!(serde_json::to_string(&list).unwrap(), "[null,true,0.5]");
    }

    #[test]
    fn test_value_send_sync() {
        static_assertions::assert_impl_all!(Value: Send, Sync, Clone);
    }
}
