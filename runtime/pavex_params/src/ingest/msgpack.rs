use std::io::Cursor;

use tracing_log_error::log_error;

use crate::value::{Map, Value, key_to_string};

use super::errors::MsgPackBodyError;

/// Decode a msgpack body into a [`Map`].
///
/// Two shapes are accepted:
///
/// - a single msgpack map, decoded as-is;
/// - a sequence of msgpack arrays, each one a flat list of alternating keys and values
///   (`[k1, v1, k2, v2, ...]`). Keys are usually raw bytes.
///   Within an array the first occurrence of a key wins, while later arrays override
///   earlier ones. Pairs are read from the end of the list, so the first element
///   of an odd-length list is ignored.
///
/// Decoding stops at the first malformed element: everything decoded up to that point
/// is kept and the error is logged.
/// Integers keep their signedness and raw bytes stay raw.
pub fn msgpack(body: &[u8]) -> Map {
    let Some(&marker) = body.first() else {
        return Map::new();
    };
    if is_map_marker(marker) {
        match rmp_serde::from_slice::<Value>(body) {
            Ok(Value::Map(map)) => map,
            Ok(other) => {
                tracing::debug!(kind = other.kind(), "The msgpack body is not a map");
                Map::new()
            }
            Err(e) => {
                let e = MsgPackBodyError { source: e };
                log_error!(e, level: tracing::Level::WARN, "Failed to decode the msgpack body");
                Map::new()
            }
        }
    } else {
        flat_lists(body)
    }
}

fn is_map_marker(marker: u8) -> bool {
    // fixmap, map16 and map32.
    matches!(marker, 0x80..=0x8f | 0xde | 0xdf)
}

fn flat_lists(body: &[u8]) -> Map {
    let mut values = Map::new();
    let mut cursor = Cursor::new(body);
    while (cursor.position() as usize) < body.len() {
        let mut items = match rmp_serde::from_read::<_, Vec<Value>>(&mut cursor) {
            Ok(items) => items,
            Err(e) => {
                let e = MsgPackBodyError { source: e };
                log_error!(e, level: tracing::Level::WARN, "Failed to decode the msgpack body");
                break;
            }
        };
        // Walk the pairs backwards: the first occurrence of a key is the last one written.
        while items.len() >= 2 {
            let (Some(value), Some(key)) = (items.pop(), items.pop()) else {
                break;
            };
            match key_to_string(key) {
                Some(key) => {
                    values.insert(key, value);
                }
                None => {
                    tracing::debug!(
                        "Skipping a msgpack pair whose key is neither a string nor bytes"
                    );
                }
            }
        }
    }
    values
}
