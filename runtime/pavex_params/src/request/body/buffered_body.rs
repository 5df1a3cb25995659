use bytes::Bytes;
use http::header::CONTENT_LENGTH;
use http_body_util::{BodyExt, Limited};
use ubyte::ByteUnit;

use crate::request::RequestHead;

use super::{
    BodySizeLimit,
    errors::{ExtractBufferedBodyError, SizeLimitExceeded, UnexpectedBufferError},
};

#[derive(Debug, Clone, Default)]
#[non_exhaustive]
/// The entire body of an incoming request, buffered in memory.
///
/// Every ingestor works on a [`BufferedBody`]: bodies are small enough, for the kind
/// of requests that carry parameters, to be decoded in one go.
///
/// # Security
///
/// [`BufferedBody::extract`] enforces a [`BodySizeLimit`] to prevent denial-of-service attacks.
pub struct BufferedBody {
    /// The buffer of bytes that represents the body of the incoming request.
    pub bytes: Bytes,
}

impl BufferedBody {
    /// Buffer `body` in memory, enforcing `body_size_limit`.
    ///
    /// If extraction fails, an [`ExtractBufferedBodyError`] is returned.
    pub async fn extract<B>(
        request_head: &RequestHead,
        body: B,
        body_size_limit: BodySizeLimit,
    ) -> Result<Self, ExtractBufferedBodyError>
    where
        B: http_body::Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        match body_size_limit {
            BodySizeLimit::Enabled { max_size } => {
                Self::_extract_with_limit(request_head, body, max_size).await
            }
            BodySizeLimit::Disabled => match body.collect().await {
                Ok(collected) => Ok(Self {
                    bytes: collected.to_bytes(),
                }),
                Err(e) => Err(UnexpectedBufferError { source: e.into() }.into()),
            },
        }
    }

    async fn _extract_with_limit<B>(
        request_head: &RequestHead,
        body: B,
        max_size: ByteUnit,
    ) -> Result<Self, ExtractBufferedBodyError>
    where
        B: http_body::Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let content_length = request_head
            .headers
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok()?.parse::<usize>().ok());

        let limit_error = || SizeLimitExceeded {
            max_size,
            content_length,
        };

        // Short-circuit if the declared size is already above the limit.
        if let Some(len) = content_length {
            if len > max_size {
                return Err(limit_error().into());
            }
        }

        // Saturate on platforms where `usize` is smaller than `u64`.
        let max_n_bytes = max_size.as_u64().try_into().unwrap_or(usize::MAX);
        let limited_body = Limited::new(body, max_n_bytes);
        match limited_body.collect().await {
            Ok(collected) => Ok(Self {
                bytes: collected.to_bytes(),
            }),
            Err(e) => {
                if e.downcast_ref::<http_body_util::LengthLimitError>()
                    .is_some()
                {
                    Err(limit_error().into())
                } else {
                    Err(UnexpectedBufferError { source: e }.into())
                }
            }
        }
    }
}

impl From<Bytes> for BufferedBody {
    fn from(bytes: Bytes) -> Self {
        Self { bytes }
    }
}

impl From<BufferedBody> for Bytes {
    fn from(buffered_body: BufferedBody) -> Self {
        buffered_body.bytes
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderMap;
    use http_body_util::Full;
    use ubyte::ToByteUnit;

    use crate::request::RequestHead;
    use crate::request::body::BodySizeLimit;

    use super::{BufferedBody, Bytes};

    // No headers.
    fn dummy_request_head() -> RequestHead {
        RequestHead {
            method: http::Method::POST,
            target: "/".parse().unwrap(),
            version: http::Version::HTTP_11,
            headers: HeaderMap::new(),
        }
    }

    #[tokio::test]
    async fn body_within_limit_is_buffered() {
        let body = Full::new(Bytes::from_static(b"test=true"));
        let buffered = BufferedBody::extract(&dummy_request_head(), body, BodySizeLimit::default())
            .await
            .unwrap();
        assert_eq!(&buffered.bytes[..], b"test=true");
    }

    #[tokio::test]
    async fn no_limit_when_disabled() {
        let body = Full::new(Bytes::from(vec![0; 1000]));
        let buffered = BufferedBody::extract(&dummy_request_head(), body, BodySizeLimit::Disabled)
            .await
            .unwrap();
        assert_eq!(buffered.bytes.len(), 1000);
    }

    #[tokio::test]
    async fn error_if_body_above_size_limit_without_content_length() {
        let raw_body = vec![0; 1000];

        // Smaller than the size of the body.
        let max_n_bytes = 100.bytes();
        assert!(raw_body.len() > max_n_bytes.as_u64() as usize);

        let body = Full::new(Bytes::from(raw_body));
        let err = BufferedBody::_extract_with_limit(&dummy_request_head(), body, max_n_bytes)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), http::StatusCode::PAYLOAD_TOO_LARGE);
        insta::assert_snapshot!(err, @"The request body is larger than the maximum size limit enforced by this server.");
        insta::assert_debug_snapshot!(err, @r###"
        SizeLimitExceeded(
            SizeLimitExceeded {
                max_size: ByteUnit(
                    100,
                ),
                content_length: None,
            },
        )
        "###);
    }

    #[tokio::test]
    /// The request lies about the size of its body: the declared size
    /// trips the limit even though the actual body would have fit.
    async fn error_if_content_length_header_is_larger_than_limit() {
        let mut request_head = dummy_request_head();

        let max_size = 100.bytes();
        let body = Full::new(Bytes::from(vec![0; 50]));
        request_head
            .headers
            .insert("Content-Length", "1000".parse().unwrap());

        let err = BufferedBody::_extract_with_limit(&request_head, body, max_size)
            .await
            .unwrap_err();
        insta::assert_debug_snapshot!(err, @r###"
        SizeLimitExceeded(
            SizeLimitExceeded {
                max_size: ByteUnit(
                    100,
                ),
                content_length: Some(
                    1000,
                ),
            },
        )
        "###);
    }
}
