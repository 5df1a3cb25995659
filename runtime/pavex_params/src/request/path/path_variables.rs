use percent_encoding::percent_decode_str;

use super::errors::InvalidUtf8InPathVariable;

/// The path variables extracted from the URL of an incoming request by a router.
///
/// They are merged last into [`Params`](crate::Params), overriding any other source.
///
/// # Example
///
/// ```rust
/// use pavex_params::request::path::PathVariables;
///
/// let mut router = matchit::Router::new();
/// router.insert("/address/{address_id}/home/{home_id}", ()).unwrap();
/// let matched = router.at("/address/the%20street/home/42").unwrap();
///
/// let variables = PathVariables::decode(&matched.params).unwrap();
/// assert_eq!(variables.get("address_id"), Some("the street"));
/// assert_eq!(variables.get("home_id"), Some("42"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathVariables(Vec<(String, String)>);

impl PathVariables {
    /// No path variables, e.g. for routes without a template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Percent-decode the raw parameters of a [`matchit`] match.
    ///
    /// It fails if any decoded value is not a valid UTF8 string.
    pub fn decode(params: &matchit::Params<'_, '_>) -> Result<Self, InvalidUtf8InPathVariable> {
        params
            .iter()
            .map(|(key, raw)| {
                percent_decode_str(raw)
                    .decode_utf8()
                    .map(|decoded| (key.to_owned(), decoded.into_owned()))
                    .map_err(|e| InvalidUtf8InPathVariable {
                        invalid_key: key.to_owned(),
                        invalid_raw_segment: raw.to_owned(),
                        source: e,
                    })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Add a path variable. Values are expected to be already decoded.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// Returns the value of the first path variable registered under the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns an iterator over the path variables, in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of path variables.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no path variables.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for PathVariables
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::PathVariables;

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut router = matchit::Router::new();
        router.insert("/address/{address_id}", ()).unwrap();
        let matched = router.at("/address/dirty%DE~%C7%1FY").unwrap();

        let err = PathVariables::decode(&matched.params).unwrap_err();
        assert_eq!(err.invalid_key(), "address_id");
        insta::assert_snapshot!(err, @"`dirty%DE~%C7%1FY` cannot be used as `address_id` since it is not a well-formed UTF8 string when percent-decoded");
    }

    #[test]
    fn collected_from_pairs() {
        let variables: PathVariables = [("id", "42"), ("slug", "hello")].into_iter().collect();
        assert_eq!(variables.len(), 2);
        assert_eq!(variables.get("slug"), Some("hello"));
        assert_eq!(variables.get("missing"), None);
    }
}
