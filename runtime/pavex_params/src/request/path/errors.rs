//! Errors that can happen when decoding path variables.
use std::str::Utf8Error;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// One of the percent-decoded path variables is not a valid UTF8 string.
///
/// URL segments must be percent-encoded whenever they contain characters that are not
/// URL safe, e.g. whitespaces.
/// [`PathVariables::decode`] percent-decodes each raw value; this error is returned
/// whenever the decoded data is not a well-formed UTF8 string.
///
/// [`PathVariables::decode`]: crate::request::path::PathVariables::decode
#[error(
    "`{invalid_raw_segment}` cannot be used as `{invalid_key}` \
since it is not a well-formed UTF8 string when percent-decoded"
)]
pub struct InvalidUtf8InPathVariable {
    pub(super) invalid_key: String,
    pub(super) invalid_raw_segment: String,
    #[source]
    pub(super) source: Utf8Error,
}

impl InvalidUtf8InPathVariable {
    /// The name of the offending path variable.
    pub fn invalid_key(&self) -> &str {
        &self.invalid_key
    }

    /// The raw, percent-encoded value that failed to decode.
    pub fn invalid_raw_segment(&self) -> &str {
        &self.invalid_raw_segment
    }
}
