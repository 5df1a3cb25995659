//! Decoders that turn one source of request data into a [`Map`](crate::Map).
//!
//! There is one ingestor per wire encoding:
//!
//! - [`form`] for the query string, `application/x-www-form-urlencoded` and
//!   `multipart/form-data` bodies;
//! - [`json`] for `application/json` (and `application/*+json`) bodies;
//! - [`msgpack`] for `application/x-msgpack` bodies.
//!
//! Ingestors never abort the request: a body that can't be decoded contributes
//! no parameters. [`Params::extract`](crate::Params::extract) combines their outputs.
pub use form::form;
pub use json::json;
pub use msgpack::msgpack;

pub mod errors;
mod form;
mod json;
mod msgpack;

use crate::request::RequestHead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
/// The encoding of a request body, as declared by its `Content-Type` header.
pub enum BodyEncoding {
    /// `application/json`, or another `application/*+json` MIME type.
    Json,
    /// `application/x-msgpack` or `application/msgpack`.
    MsgPack,
    /// `application/x-www-form-urlencoded`.
    UrlEncoded,
    /// `multipart/form-data`.
    Multipart,
    /// Anything else, including a missing or invalid `Content-Type` header.
    Other,
}

impl BodyEncoding {
    /// Inspect the `Content-Type` header. Parameters (e.g. `charset`) are ignored.
    pub fn detect(request_head: &RequestHead) -> Self {
        let Some(content_type) = request_head.content_type() else {
            return BodyEncoding::Other;
        };
        let Ok(mime) = content_type.parse::<mime::Mime>() else {
            return BodyEncoding::Other;
        };

        if mime.type_() == mime::MULTIPART && mime.subtype() == mime::FORM_DATA {
            return BodyEncoding::Multipart;
        }
        if mime.type_() != mime::APPLICATION {
            return BodyEncoding::Other;
        }
        if mime.subtype() == mime::JSON || mime.suffix().is_some_and(|name| name == "json") {
            BodyEncoding::Json
        } else if mime.subtype() == mime::WWW_FORM_URLENCODED {
            BodyEncoding::UrlEncoded
        } else if mime.subtype() == "x-msgpack" || mime.subtype() == "msgpack" {
            BodyEncoding::MsgPack
        } else {
            BodyEncoding::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderMap;

    use crate::request::RequestHead;

    use super::BodyEncoding;

    fn head(content_type: Option<&str>) -> RequestHead {
        let mut headers = HeaderMap::new();
        if let Some(content_type) = content_type {
            headers.insert(http::header::CONTENT_TYPE, content_type.parse().unwrap());
        }
        RequestHead {
            method: http::Method::POST,
            target: "/".parse().unwrap(),
            version: http::Version::HTTP_11,
            headers,
        }
    }

    #[test]
    fn detection() {
        let cases = [
            (None, BodyEncoding::Other),
            (Some("hello world"), BodyEncoding::Other),
            (Some("application/json"), BodyEncoding::Json),
            (Some("application/json; charset=utf8"), BodyEncoding::Json),
            (Some("application/hal+json"), BodyEncoding::Json),
            (Some("application/x-msgpack"), BodyEncoding::MsgPack),
            (Some("application/msgpack"), BodyEncoding::MsgPack),
            (
                Some("application/x-www-form-urlencoded; charset=utf-8"),
                BodyEncoding::UrlEncoded,
            ),
            (
                Some("multipart/form-data; boundary=X-BOUNDARY"),
                BodyEncoding::Multipart,
            ),
            (Some("application/xml"), BodyEncoding::Other),
            (Some("text/plain"), BodyEncoding::Other),
        ];
        for (content_type, expected) in cases {
            assert_eq!(
                BodyEncoding::detect(&head(content_type)),
                expected,
                "{content_type:?}"
            );
        }
    }
}
