//! Errors that can occur while decoding a request body.
//!
//! They are never returned to the caller of [`Params::extract`](crate::Params::extract):
//! they are logged and the offending source is ignored.

#[derive(Debug, thiserror::Error)]
#[error("Failed to decode the body as a JSON object.\n{source}")]
#[non_exhaustive]
/// The body is not a valid JSON document, or its top-level value is not an object.
pub struct JsonBodyError {
    #[source]
    pub(super) source: serde_json::Error,
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to decode the body as msgpack.\n{source}")]
#[non_exhaustive]
/// The body is not a valid msgpack map, nor a sequence of msgpack arrays.
pub struct MsgPackBodyError {
    #[source]
    pub(super) source: rmp_serde::decode::Error,
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to parse the body as a multipart form.\n{source}")]
#[non_exhaustive]
/// The `multipart/form-data` body is malformed, or the `Content-Type` header lacks a boundary.
pub struct MultipartBodyError {
    #[from]
    pub(super) source: multer::Error,
}
