//! Pure coercion rules, from a [`Value`] to a concrete Rust type.
//!
//! Every function returns `None` when the value can't be represented as the target type.
use jiff::Timestamp;
use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;

use crate::value::Value;

/// `YYYY-MM-DD`.
pub const DATE_ONLY: &str = "%Y-%m-%d";
/// `YYYY-MM-DD HH:MM:SS`. Prefer RFC 3339 when you control the client.
pub const DATE_TIME: &str = "%Y-%m-%d %H:%M:%S";
/// The format used by `<input type="datetime-local">`.
pub const HTML_DATE_TIME_LOCAL: &str = "%Y-%m-%dT%H:%M";

pub(crate) fn to_float(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.parse::<f64>().ok(),
        Value::Float(f) => Some(*f),
        Value::Int(i) => Some(*i as f64),
        Value::Uint(u) => Some(*u as f64),
        _ => None,
    }
}

/// Numeric strings are parsed as floats and then truncated towards zero.
pub(crate) fn to_int(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => s.parse::<f64>().ok().map(|f| f as i64),
        Value::Int(i) => Some(*i),
        Value::Uint(u) => i64::try_from(*u).ok(),
        Value::Float(f) => Some(*f as i64),
        _ => None,
    }
}

/// A literal boolean, or an integer where zero is `false` and anything else is `true`.
pub(crate) fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        other => to_int(other).map(|i| i != 0),
    }
}

pub(crate) fn to_u64(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => parse_u64(s),
        Value::Uint(u) => Some(*u),
        Value::Int(i) => Some(*i as u64),
        Value::Float(f) => Some(*f as u64),
        Value::Bytes(b) => std::str::from_utf8(b).ok().and_then(parse_u64),
        _ => None,
    }
}

fn parse_u64(s: &str) -> Option<u64> {
    s.parse::<u64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().map(|f| f as u64))
}

/// Strings are returned as-is, bytes are decoded as UTF-8 text.
pub(crate) fn to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bytes(b) => Some(String::from_utf8_lossy(b).into_owned()),
        _ => None,
    }
}

/// Formats are tried in order: RFC 3339, [`DATE_ONLY`], [`DATE_TIME`] and
/// [`HTML_DATE_TIME_LOCAL`]. `tz` is used to interpret the formats that carry no offset.
pub(crate) fn to_time(value: &Value, tz: &TimeZone) -> Option<Timestamp> {
    match value {
        Value::Time(t) => Some(*t),
        Value::String(s) => parse_time(s, tz),
        _ => None,
    }
}

fn parse_time(s: &str, tz: &TimeZone) -> Option<Timestamp> {
    if is_rfc3339(s) {
        if let Ok(timestamp) = s.parse::<Timestamp>() {
            return Some(timestamp);
        }
    }
    if let Ok(date) = Date::strptime(DATE_ONLY, s) {
        return date.to_zoned(tz.clone()).ok().map(|z| z.timestamp());
    }
    [DATE_TIME, HTML_DATE_TIME_LOCAL]
        .into_iter()
        .find_map(|format| DateTime::strptime(format, s).ok())
        .and_then(|datetime| datetime.to_zoned(tz.clone()).ok())
        .map(|z| z.timestamp())
}

/// The shape of an RFC 3339 timestamp: extended date, `T` separator, and either `Z`
/// or a `±HH:MM` offset. Seconds may be omitted.
///
/// `Timestamp::from_str` is more lenient: it accepts basic-format dates,
/// space separators and hour-only offsets.
fn is_rfc3339(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() < 17
        || bytes[4] != b'-'
        || bytes[7] != b'-'
        || !matches!(bytes[10], b'T' | b't')
    {
        return false;
    }
    match bytes[bytes.len() - 1] {
        b'Z' | b'z' => true,
        _ => {
            let offset = &bytes[bytes.len() - 6..];
            matches!(offset[0], b'+' | b'-')
                && offset[1..3].iter().all(u8::is_ascii_digit)
                && offset[3] == b':'
                && offset[4..].iter().all(u8::is_ascii_digit)
        }
    }
}

// Elements that can't be coerced are kept as zero values, so that positions line up
// with the input list.

pub(crate) fn to_float_list(value: &Value) -> Option<Vec<f64>> {
    match value {
        Value::List(items) => Some(
            items
                .iter()
                .map(|item| to_float(item).unwrap_or_default())
                .collect(),
        ),
        Value::String(s) => Some(split_csv(s, |item| item.parse().ok())),
        _ => None,
    }
}

pub(crate) fn to_int_list(value: &Value) -> Option<Vec<i64>> {
    match value {
        Value::List(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.parse().unwrap_or_default(),
                    other => to_int(other).unwrap_or_default(),
                })
                .collect(),
        ),
        Value::String(s) => Some(split_csv(s, |item| item.parse().ok())),
        Value::Bytes(b) => Some(split_csv(&String::from_utf8_lossy(b), |item| {
            item.parse().ok()
        })),
        _ => None,
    }
}

pub(crate) fn to_u64_list(value: &Value) -> Option<Vec<u64>> {
    match value {
        Value::List(items) => Some(
            items
                .iter()
                .map(|item| to_u64(item).unwrap_or_default())
                .collect(),
        ),
        Value::String(s) => Some(split_csv(s, parse_u64)),
        Value::Bytes(b) => Some(split_csv(&String::from_utf8_lossy(b), parse_u64)),
        _ => None,
    }
}

pub(crate) fn to_string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::List(items) => Some(
            items
                .iter()
                .map(|item| to_string(item).unwrap_or_default())
                .collect(),
        ),
        Value::String(s) => Some(split_csv(s, |item| Some(item.to_owned()))),
        _ => None,
    }
}

/// An empty string is an empty list.
fn split_csv<T: Default>(s: &str, parse: impl Fn(&str) -> Option<T>) -> Vec<T> {
    if s.is_empty() {
        return Vec::new();
    }
    s.split(',')
        .map(|item| parse(item).unwrap_or_default())
        .collect()
}
