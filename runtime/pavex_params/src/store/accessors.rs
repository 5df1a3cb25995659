use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::value::{Map, UploadedFile, Value, json_object_to_map};

use super::{Params, coerce};

/// Generate the `*_or_default` twin of a `get_*` accessor.
macro_rules! or_default {
    ($($name:ident: $ty:ty),* $(,)?) => {
        paste::paste! {
            impl Params {
                $(
                    #[doc = "Like [`Params::get_" $name "`], but returns the default value on failure."]
                    pub fn [<$name _or_default>](&self, key: &str) -> $ty {
                        self.[<get_ $name>](key).unwrap_or_default()
                    }
                )*
            }
        }
    };
}

or_default! {
    float: f64,
    bool: bool,
    int: i64,
    i8: i8,
    i16: i16,
    i32: i32,
    i64: i64,
    u64: u64,
    string: String,
    time: Timestamp,
    float_list: Vec<f64>,
    int_list: Vec<i64>,
    u64_list: Vec<u64>,
    string_list: Vec<String>,
    json: Map,
}

impl Params {
    /// A float, or a string that parses as one.
    pub fn get_float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(coerce::to_float)
    }

    /// A boolean.
    ///
    /// Anything that [`Params::get_int`] accepts is also accepted:
    /// zero is `false`, everything else is `true`.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(coerce::to_bool)
    }

    /// An integer.
    ///
    /// Floats, and strings that parse as floats, are truncated towards zero.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(coerce::to_int)
    }

    /// Like [`Params::get_int`], but fails if the value doesn't fit in an `i8`.
    pub fn get_i8(&self, key: &str) -> Option<i8> {
        self.get_int(key).and_then(|i| i8::try_from(i).ok())
    }

    /// Like [`Params::get_int`], but fails if the value doesn't fit in an `i16`.
    pub fn get_i16(&self, key: &str) -> Option<i16> {
        self.get_int(key).and_then(|i| i16::try_from(i).ok())
    }

    /// Like [`Params::get_int`], but fails if the value doesn't fit in an `i32`.
    pub fn get_i32(&self, key: &str) -> Option<i32> {
        self.get_int(key).and_then(|i| i32::try_from(i).ok())
    }

    /// Same as [`Params::get_int`].
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get_int(key)
    }

    /// An unsigned integer.
    ///
    /// Signed integers are cast, floats are truncated, strings and raw bytes are parsed.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(coerce::to_u64)
    }

    /// A string, or raw bytes decoded as UTF-8.
    ///
    /// Leading and trailing spaces are trimmed.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key)
            .and_then(coerce::to_string)
            .map(|s| s.trim_matches(' ').to_owned())
    }

    /// Raw bytes, or a base64-encoded string.
    ///
    /// A successfully decoded string is written back into the store as bytes, so that
    /// following calls don't decode it again.
    /// `None` is returned if the string is not valid base64.
    pub fn get_bytes(&mut self, key: &str) -> Option<Bytes> {
        let slot = self.get_mut(key)?;
        let decoded = match &*slot {
            Value::Bytes(b) => return Some(b.clone()),
            Value::String(s) => match STANDARD.decode(s.as_bytes()) {
                Ok(decoded) => Bytes::from(decoded),
                Err(e) => {
                    tracing::debug!(
                        key,
                        error.message = %e,
                        "The parameter is not a valid base64 string"
                    );
                    return None;
                }
            },
            _ => return None,
        };
        *slot = Value::Bytes(decoded.clone());
        Some(decoded)
    }

    /// Like [`Params::get_bytes`], but returns an empty buffer on failure.
    pub fn bytes_or_default(&mut self, key: &str) -> Bytes {
        self.get_bytes(key).unwrap_or_default()
    }

    /// A timestamp, interpreting formats without an offset as UTC.
    ///
    /// See [`Params::get_time_in`] for the accepted formats.
    pub fn get_time(&self, key: &str) -> Option<Timestamp> {
        self.get_time_in(key, &TimeZone::UTC)
    }

    /// A timestamp.
    ///
    /// Strings are parsed with the first format that matches:
    ///
    /// 1. RFC 3339 (e.g. `2016-06-07T00:30:00Z`), with a `T` separator and either `Z`
    ///    or a `±HH:MM` offset. Seconds may be omitted (e.g. `2016-06-07T00:30Z`).
    /// 2. [`DATE_ONLY`](crate::DATE_ONLY) (e.g. `2016-07-17`)
    /// 3. [`DATE_TIME`](crate::DATE_TIME) (e.g. `2016-07-17 10:20:30`)
    /// 4. [`HTML_DATE_TIME_LOCAL`](crate::HTML_DATE_TIME_LOCAL) (e.g. `2016-07-17T10:20`)
    ///
    /// `tz` is used for the last three formats, which don't carry an offset.
    pub fn get_time_in(&self, key: &str, tz: &TimeZone) -> Option<Timestamp> {
        self.get(key).and_then(|v| coerce::to_time(v, tz))
    }

    /// Like [`Params::get_time_in`], but returns the default timestamp on failure.
    pub fn time_in_or_default(&self, key: &str, tz: &TimeZone) -> Timestamp {
        self.get_time_in(key, tz).unwrap_or_default()
    }

    /// A list of floats, from a native list or a comma-separated string.
    pub fn get_float_list(&self, key: &str) -> Option<Vec<f64>> {
        self.get(key).and_then(coerce::to_float_list)
    }

    /// A list of integers, from a native list, a comma-separated string or
    /// comma-separated raw bytes.
    pub fn get_int_list(&self, key: &str) -> Option<Vec<i64>> {
        self.get(key).and_then(coerce::to_int_list)
    }

    /// A list of unsigned integers, from a native list, a comma-separated string or
    /// comma-separated raw bytes.
    pub fn get_u64_list(&self, key: &str) -> Option<Vec<u64>> {
        self.get(key).and_then(coerce::to_u64_list)
    }

    /// A list of strings, from a native list or a comma-separated string.
    pub fn get_string_list(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).and_then(coerce::to_string_list)
    }

    /// A nested object, or a string holding a JSON object.
    pub fn get_json(&self, key: &str) -> Option<Map> {
        if let Some(Value::Map(map)) = self.get(key) {
            return Some(map.clone());
        }
        let raw = self.get_string(key)?;
        serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(&raw)
            .ok()
            .map(json_object_to_map)
    }

    /// A file uploaded via a `multipart/form-data` body.
    pub fn get_file(&self, key: &str) -> Option<&UploadedFile> {
        match self.get(key)? {
            Value::File(file) => Some(file),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use crate::value::{Map, UploadedFile, Value};
    use crate::Params;

    #[test]
    fn string_and_get_agree_on_presence() {
        let mut params = Params::new();
        params.insert("name", "  John Doe ");
        params.insert("raw", b"bytes".to_vec());

        for key in ["name", "raw", "missing"] {
            assert_eq!(params.get(key).is_some(), params.get_string(key).is_some());
        }
        assert_eq!(params.get_string("name").as_deref(), Some("John Doe"));
        assert_eq!(params.string_or_default("missing"), "");
    }

    #[test]
    fn sized_integers_are_range_checked() {
        let mut params = Params::new();
        params.insert("small", "127");
        params.insert("big", "128");
        params.insert("huge", 3_000_000_000.0);

        assert_eq!(params.get_i8("small"), Some(127));
        assert_eq!(params.get_i8("big"), None);
        assert_eq!(params.get_i16("big"), Some(128));
        assert_eq!(params.get_i32("huge"), None);
        assert_eq!(params.get_i64("huge"), Some(3_000_000_000));
        assert_eq!(params.i8_or_default("big"), 0);
    }

    #[test]
    fn bytes_are_decoded_once_and_cached() {
        let mut params = Params::new();
        params.insert("data", "aGVsbG8=");

        let first = params.get_bytes("data").unwrap();
        assert_eq!(&first[..], b"hello");
        // The decoded bytes replaced the base64 string.
        assert_eq!(params.get("data"), Some(&Value::Bytes(first.clone())));

        let second = params.get_bytes("data").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn nested_bytes_are_cached_in_place() {
        let mut inner = Map::new();
        inner.insert("data".into(), Value::from("aGVsbG8="));
        let mut params = Params::new();
        params.insert("payload", inner);

        assert_eq!(&params.get_bytes("payload.data").unwrap()[..], b"hello");
        assert!(matches!(params.get("payload.data"), Some(Value::Bytes(_))));
        assert!(!params.contains_key("payload.data"));
    }

    #[test]
    fn invalid_base64_is_absent_and_left_untouched() {
        let mut params = Params::new();
        params.insert("data", "not base64!");
        params.insert("number", 1.0);

        assert_eq!(params.get_bytes("data"), None);
        assert_eq!(params.get("data"), Some(&Value::from("not base64!")));
        assert_eq!(params.get_bytes("number"), None);
        assert!(params.bytes_or_default("missing").is_empty());
    }

    #[test]
    fn json_from_nested_map_or_string() {
        let mut coord = Map::new();
        coord.insert("lat".into(), Value::Float(50.505));
        let mut params = Params::new();
        params.insert("coord", coord.clone());
        params.insert("raw", r#"{"lat": 50.505}"#);
        params.insert("broken", "{");

        assert_eq!(params.get_json("coord"), Some(coord.clone()));
        assert_eq!(params.get_json("raw"), Some(coord));
        assert_eq!(params.get_json("broken"), None);
        assert!(params.json_or_default("broken").is_empty());
    }

    #[test]
    fn files_are_never_coerced() {
        let file = UploadedFile {
            field_name: "avatar".into(),
            file_name: Some("me.png".into()),
            content_type: Some(mime::IMAGE_PNG),
            bytes: b"png".to_vec().into(),
        };
        let mut params = Params::new();
        params.insert("avatar", file.clone());
        params.insert("name", "me.png");

        assert_eq!(params.get_file("avatar"), Some(&file));
        assert_eq!(params.get_file("name"), None);
    }

    #[test]
    fn literal_timestamps_are_returned_as_is() {
        let now = Timestamp::now();
        let mut params = Params::new();
        params.insert("at", now);
        assert_eq!(params.get_time("at"), Some(now));
        assert_eq!(params.time_or_default("missing"), Timestamp::default());
    }

    #[test]
    fn comma_separated_round_trip() {
        let ids = [4u64, 8, 15, 16, 23, 42];
        let encoded = ids.map(|id| id.to_string()).join(",");
        let mut params = Params::new();
        params.insert("ids", encoded);

        assert_eq!(params.get_u64_list("ids"), Some(ids.to_vec()));
        assert_eq!(
            params.get_int_list("ids"),
            Some(ids.iter().map(|&i| i as i64).collect())
        );
        assert_eq!(params.get_float_list("ids").map(|l| l.len()), Some(ids.len()));
    }
}
