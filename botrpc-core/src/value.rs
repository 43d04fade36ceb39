//! Parameter values.
//!
//! Every remote method takes a mapping of named parameters. A parameter is a
//! [`Value`]: a JSON-like tree whose leaves may also be file attachments.
//! Attachments are what force a request into multipart encoding.

use bytes::Bytes;
use serde::ser::{Error as _, Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::file::InputFile;
use crate::params::Params;

/// A single parameter value.
///
/// `Null` marks an omitted optional parameter; [`Value::normalize`] drops it
/// from objects before anything is sent.
#[derive(Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<Value>),
    Object(Params),
    File(InputFile),
}

impl Value {
    /// Returns `true` for attachments (byte buffers, byte streams, named files).
    ///
    /// Arrays and objects are never file-like, even when they contain files.
    pub fn is_file_like(&self) -> bool {
        matches!(self, Value::File(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Recursively strip `Null` entries from objects.
    ///
    /// - arrays are normalized element-wise; their length never changes
    /// - files are returned untouched
    /// - objects keep only non-null keys, in insertion order
    /// - scalars are returned as-is
    pub fn normalize(self) -> Value {
        match self {
            Value::Array(items) => Value::Array(items.into_iter().map(Value::normalize).collect()),
            Value::Object(params) => Value::Object(params.normalize()),
            other => other,
        }
    }

    /// Render the value as plain JSON for diagnostics.
    ///
    /// Attachments cannot be represented in JSON, so they are replaced with a
    /// short descriptor such as `"<file report.pdf>"`.
    pub fn snapshot(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::snapshot).collect())
            }
            Value::Object(params) => params.snapshot(),
            Value::File(file) => serde_json::Value::String(match file.name() {
                Some(name) => format!("<file {name}>"),
                None => "<file>".to_string(),
            }),
        }
    }

    /// Text used when this value is sent as a multipart text field.
    ///
    /// Strings are sent raw, other scalars in their JSON form, and arrays or
    /// objects as JSON text. Returns `None` for attachments.
    pub fn to_form_text(&self) -> Option<Result<String, serde_json::Error>> {
        match self {
            Value::File(_) => None,
            Value::String(s) => Some(Ok(s.clone())),
            other => Some(serde_json::to_string(other)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(params) => {
                let mut map = serializer.serialize_map(Some(params.len()))?;
                for (key, value) in params.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::File(_) => Err(S::Error::custom(
                "file attachments can only be sent as multipart form data",
            )),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(map.into_iter().collect()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n.into())
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

impl From<f64> for Value {
    /// Non-finite floats have no JSON form and become `Null`.
    fn from(n: f64) -> Self {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Params> for Value {
    fn from(params: Params) -> Self {
        Value::Object(params)
    }
}

impl From<InputFile> for Value {
    fn from(file: InputFile) -> Self {
        Value::File(file)
    }
}

impl From<Bytes> for Value {
    fn from(data: Bytes) -> Self {
        Value::File(InputFile::bytes(data))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
