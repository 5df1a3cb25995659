//! The dynamically-typed values held by a [`Params`](crate::Params) store.
use std::fmt;

use bytes::Bytes;
use indexmap::IndexMap;
use jiff::Timestamp;
use serde::de::{Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};

/// A string-keyed mapping of [`Value`]s.
///
/// Used both for the top level of a [`Params`](crate::Params) store and for nested objects.
pub type Map = IndexMap<String, Value>;

/// A loosely-typed value extracted from an incoming request.
///
/// Every ingestor (query string, form, multipart, JSON, msgpack, path variables) produces
/// [`Value`]s. The typed accessors on [`Params`](crate::Params) coerce them into the type
/// you ask for.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An explicit `null`/`nil`.
    Null,
    Bool(bool),
    /// A signed integer, as found in msgpack payloads.
    Int(i64),
    /// An unsigned integer, as found in msgpack payloads or numeric `*id*` path variables.
    Uint(u64),
    /// A floating point number. JSON numbers are always stored as floats.
    Float(f64),
    String(String),
    /// Raw bytes, either from a msgpack `bin` payload or a decoded base64 string.
    Bytes(Bytes),
    List(Vec<Value>),
    Map(Map),
    Time(Timestamp),
    /// A file uploaded as part of a `multipart/form-data` body.
    File(UploadedFile),
}

/// A file uploaded via a `multipart/form-data` request body.
///
/// Only the first file for each field is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    /// The name of the form field the file was attached to.
    pub field_name: String,
    /// The file name advertised by the client, if any.
    pub file_name: Option<String>,
    /// The `Content-Type` of the part, if any.
    pub content_type: Option<mime::Mime>,
    /// The contents of the file.
    pub bytes: Bytes,
}

impl Value {
    /// A short, human-readable name for the variant. Used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Time(_) => "time",
            Value::File(_) => "file",
        }
    }

    /// Return the nested mapping, if this is a [`Value::Map`].
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub(crate) fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Return the string slice, if this is a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Uint(u)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl From<Timestamp> for Value {
    fn from(t: Timestamp) -> Self {
        Value::Time(t)
    }
}

impl From<UploadedFile> for Value {
    fn from(f: UploadedFile) -> Self {
        Value::File(f)
    }
}

/// JSON numbers are stored as floats, regardless of their textual representation.
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Float),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(object) => Value::Map(json_object_to_map(object)),
        }
    }
}

pub(crate) fn json_object_to_map(object: serde_json::Map<String, serde_json::Value>) -> Map {
    object
        .into_iter()
        .map(|(key, value)| (key, Value::from(value)))
        .collect()
}

/// Convert a value used as a mapping key into a string.
///
/// Binary formats (msgpack) often encode keys as raw bytes rather than strings.
pub(crate) fn key_to_string(key: Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s),
        Value::Bytes(b) => Some(String::from_utf8_lossy(&b).into_owned()),
        Value::Int(i) => Some(i.to_string()),
        Value::Uint(u) => Some(u.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any self-describing value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Uint(v))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_bytes<E>(self, v: &[u8]) -> Result<Value, E> {
        Ok(Value::Bytes(Bytes::copy_from_slice(v)))
    }

    fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Value, E> {
        Ok(Value::Bytes(v.into()))
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer)
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::List(items))
    }

    fn visit_map<A>(self, mut access: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = Map::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<Value, Value>()? {
            match key_to_string(key) {
                Some(key) => {
                    map.insert(key, value);
                }
                None => {
                    tracing::debug!("Skipping a map entry whose key is neither a string nor bytes");
                }
            }
        }
        Ok(Value::Map(map))
    }
}
