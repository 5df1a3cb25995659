use http::{HeaderMap, Method, Uri, Version};

#[non_exhaustive]
#[derive(Debug, Clone)]
/// All the information that is transmitted as part of an HTTP request ahead of the body.
///
/// The ingestors look at the [method](Method), the query string of the [URI](Uri)
/// and the `Content-Type` [header](HeaderMap).
pub struct RequestHead {
    pub method: Method,
    pub target: Uri,
    pub version: Version,
    pub headers: HeaderMap,
}

impl RequestHead {
    /// The raw `Content-Type` header, if present and valid ASCII.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }
}

impl From<http::request::Parts> for RequestHead {
    fn from(parts: http::request::Parts) -> Self {
        Self {
            method: parts.method,
            target: parts.uri,
            version: parts.version,
            headers: parts.headers,
        }
    }
}
