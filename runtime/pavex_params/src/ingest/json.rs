use crate::value::{Map, json_object_to_map};

use super::errors::JsonBodyError;

/// Decode a JSON body into a [`Map`].
///
/// The top-level value must be an object. Numbers are always stored as
/// [`Value::Float`](crate::Value::Float), nested objects as [`Value::Map`](crate::Value::Map).
pub fn json(body: &[u8]) -> Result<Map, JsonBodyError> {
    let object: serde_json::Map<String, serde_json::Value> =
        serde_json::from_slice(body).map_err(|e| JsonBodyError { source: e })?;
    Ok(json_object_to_map(object))
}
