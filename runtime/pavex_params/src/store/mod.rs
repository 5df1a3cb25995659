//! The per-request parameter store.
use crate::value::{Map, Value};

mod accessors;
pub(crate) mod coerce;

const FILTERED: &str = "FILTERED";

/// All the parameters of an incoming request, normalized into a single mapping.
///
/// A [`Params`] store merges the query string, the request body (form, multipart,
/// JSON or msgpack) and the path variables extracted by your router.
/// Check out [`Params::extract`] for the precedence rules.
///
/// Values are loosely typed: use the typed accessors (e.g. [`Params::get_int`],
/// [`Params::get_string_list`]) to coerce them into what you need, or
/// [`Params::imbue`] to populate a struct in one go.
///
/// # Lifetime
///
/// There is exactly one [`Params`] per request. It is either attached to the request
/// (see [`parse_request`](crate::parse_request)) or threaded by reference through your
/// handling code. It is never shared across requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: Map,
}

impl Params {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value using a dot-delimited path.
    ///
    /// `"coord.lat"` resolves `lat` inside the nested mapping stored under `coord`.
    /// `None` is returned if any segment is missing or if a non-terminal segment
    /// does not resolve to a nested mapping. The lookup never mutates the store.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pavex_params::{Map, Params, Value};
    ///
    /// let mut coord = Map::new();
    /// coord.insert("lat".into(), Value::Float(50.505));
    /// let mut params = Params::new();
    /// params.insert("coord", Value::Map(coord));
    ///
    /// assert_eq!(params.get("coord.lat"), Some(&Value::Float(50.505)));
    /// assert_eq!(params.get("coord.nonexistent"), None);
    /// ```
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split('.');
        let mut current = self.values.get(segments.next()?)?;
        for segment in segments {
            current = current.as_map()?.get(segment)?;
        }
        Some(current)
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        let mut segments = key.split('.');
        let mut current = self.values.get_mut(segments.next()?)?;
        for segment in segments {
            current = current.as_map_mut()?.get_mut(segment)?;
        }
        Some(current)
    }

    /// Store a value at the top level, replacing any previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Remove a top-level value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.shift_remove(key)
    }

    /// Returns `true` if `key` is present at the top level.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// An iterator over the top-level keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// The number of top-level entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the store holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The underlying mapping.
    pub fn values(&self) -> &Map {
        &self.values
    }

    /// Mutable access to the underlying mapping.
    pub fn values_mut(&mut self) -> &mut Map {
        &mut self.values
    }

    /// Consume the store, returning the underlying mapping.
    pub fn into_inner(self) -> Map {
        self.values
    }

    /// Check that every key in `keys` is present at the top level.
    ///
    /// Returns `true` alongside an empty list if all of them are there.
    /// Otherwise returns `false` and the missing keys, in the order they were requested.
    pub fn has_all<'k>(&self, keys: &[&'k str]) -> (bool, Vec<&'k str>) {
        let missing: Vec<&'k str> = keys
            .iter()
            .copied()
            .filter(|key| !self.values.contains_key(*key))
            .collect();
        (missing.is_empty(), missing)
    }

    /// Remove every top-level key that is not in `allowed_keys`.
    ///
    /// Keys are compared case-insensitively.
    pub fn permit<S: AsRef<str>>(&mut self, allowed_keys: &[S]) {
        self.values
            .retain(|key, _| contains_ignore_case(allowed_keys, key));
    }

    /// A copy of the store that is safe to log.
    ///
    /// Values whose key appears in `filtered_keys` (case-insensitive) are replaced
    /// with `["FILTERED"]`, raw bytes are rendered as text and uploaded files
    /// are replaced by their name.
    pub fn redacted<S: AsRef<str>>(&self, filtered_keys: &[S]) -> Map {
        self.values
            .iter()
            .map(|(key, value)| {
                let value = if contains_ignore_case(filtered_keys, key) {
                    Value::List(vec![Value::from(FILTERED)])
                } else {
                    match value {
                        Value::Bytes(b) => Value::String(String::from_utf8_lossy(b).into_owned()),
                        Value::File(f) => Value::String(format!(
                            "<file {}>",
                            f.file_name.as_deref().unwrap_or(&f.field_name)
                        )),
                        other => other.clone(),
                    }
                };
                (key.clone(), value)
            })
            .collect()
    }
}

impl From<Map> for Params {
    fn from(values: Map) -> Self {
        Self { values }
    }
}

impl FromIterator<(String, Value)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

fn contains_ignore_case<S: AsRef<str>>(haystack: &[S], needle: &str) -> bool {
    let needle = needle.to_lowercase();
    haystack
        .iter()
        .any(|straw| straw.as_ref().to_lowercase() == needle)
}

#[cfg(test)]
mod tests {
    use crate::value::{Map, UploadedFile, Value};

    use super::Params;

    fn nested() -> Params {
        let mut coord = Map::new();
        coord.insert("lat".into(), Value::Float(50.505));
        coord.insert("lon".into(), Value::Float(10.101));
        let mut params = Params::new();
        params.insert("test", true);
        params.insert("coord", coord);
        params
    }

    #[test]
    fn dotted_lookup_descends_into_nested_maps() {
        let params = nested();
        assert_eq!(params.get("coord.lat"), Some(&Value::Float(50.505)));
        assert_eq!(params.get("coord.lon"), Some(&Value::Float(10.101)));
        assert!(params.get("coord").unwrap().as_map().is_some());
    }

    #[test]
    fn dotted_lookup_is_all_or_nothing() {
        let params = nested();
        assert_eq!(params.get("coord.nonexistent"), None);
        assert_eq!(params.get("missing.lat"), None);
        // `test` is a boolean, not a mapping.
        assert_eq!(params.get("test.lat"), None);
        assert_eq!(params.get("coord.lat.deeper"), None);
    }

    #[test]
    fn has_all_reports_missing_keys_in_order() {
        let mut params = Params::new();
        params.insert("test", true);
        params.insert("keys", "this,that,something");
        params.insert("values", "1,2,3");

        assert_eq!(params.has_all(&["test", "keys", "values"]), (true, vec![]));
        assert_eq!(params.has_all(&["test"]), (true, vec![]));
        assert_eq!(params.has_all(&["test", "nope"]), (false, vec!["nope"]));
        assert_eq!(
            params.has_all(&["negative", "nope"]),
            (false, vec!["negative", "nope"])
        );
    }

    #[test]
    fn permit_drops_keys_outside_the_allow_list() {
        let mut params = Params::new();
        params.insert("Name", "John");
        params.insert("age", 43u64);
        params.insert("is_admin", true);

        params.permit(&["name", "AGE"]);

        let keys: Vec<_> = params.keys().collect();
        assert_eq!(keys, vec!["Name", "age"]);
    }

    #[test]
    fn redaction() {
        let mut params = Params::new();
        params.insert("user", "john");
        params.insert("Password", "hunter2");
        params.insert("blob", b"raw".to_vec());
        params.insert(
            "avatar",
            UploadedFile {
                field_name: "avatar".into(),
                file_name: Some("me.png".into()),
                content_type: None,
                bytes: Default::default(),
            },
        );

        let redacted = params.redacted(&["password"]);
        insta::assert_debug_snapshot!(redacted, @r###"
        {
            "user": String(
                "john",
            ),
            "Password": List(
                [
                    String(
                        "FILTERED",
                    ),
                ],
            ),
            "blob": String(
                "raw",
            ),
            "avatar": String(
                "<file me.png>",
            ),
        }
        "###);
    }
}
