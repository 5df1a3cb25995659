//! Combine the outputs of every ingestor into a single [`Params`] store.
use bytes::Bytes;
use tracing_log_error::log_error;

use crate::config::ParamsConfig;
use crate::ingest::{self, BodyEncoding};
use crate::request::RequestHead;
use crate::request::body::BufferedBody;
use crate::request::body::errors::ExtractBufferedBodyError;
use crate::request::path::PathVariables;
use crate::store::Params;
use crate::value::{Map, Value};

impl Params {
    /// Build the parameter store for an incoming request.
    ///
    /// Sources are merged according to the following rules:
    ///
    /// 1. If the body is JSON (and not empty) or msgpack, its top-level keys come first.
    /// 2. Keys from the query string and from form-encoded bodies are only added
    ///    if they are not already present. See [`ingest::form`] for the details.
    /// 3. Path variables are inserted last, overriding any other source.
    ///    If the name of a path variable contains `id`, its value is stored as an
    ///    unsigned integer, if it is made of ASCII digits only.
    ///
    /// Extraction never fails: a body that can't be decoded is logged and ignored.
    /// The resulting store is logged at `DEBUG` level, redacting the
    /// [filtered keys](ParamsConfig::filtered_keys).
    pub async fn extract(
        request_head: &RequestHead,
        body: &BufferedBody,
        path_variables: &PathVariables,
        config: &ParamsConfig,
    ) -> Params {
        let form = ingest::form(request_head, body).await;
        let values = match decode_body(request_head, body) {
            Some(mut values) => {
                for (key, value) in form {
                    values.entry(key).or_insert(value);
                }
                values
            }
            None => form,
        };

        let mut params = Params::from(values);
        for (key, value) in path_variables.iter() {
            params.insert(key, path_variable(key, value));
        }

        tracing::debug!(
            params = ?params.redacted(&config.filtered_keys),
            "Parsed the request parameters"
        );
        params
    }
}

fn decode_body(request_head: &RequestHead, body: &BufferedBody) -> Option<Map> {
    match BodyEncoding::detect(request_head) {
        BodyEncoding::Json if !body.bytes.is_empty() => match ingest::json(&body.bytes) {
            Ok(values) => Some(values),
            Err(e) => {
                log_error!(
                    e,
                    level: tracing::Level::WARN,
                    "Failed to decode the JSON body, ignoring it"
                );
                None
            }
        },
        BodyEncoding::MsgPack => Some(ingest::msgpack(&body.bytes)),
        _ => None,
    }
}

fn path_variable(key: &str, value: &str) -> Value {
    // `u64::from_str` accepts a leading `+`, which would not survive a round-trip.
    if key.contains("id") && !value.starts_with('+') {
        if let Ok(id) = value.parse::<u64>() {
            return Value::Uint(id);
        }
    }
    Value::from(value)
}

/// Buffer the body of `request`, extract its [`Params`] and attach them to the
/// request extensions.
///
/// The request is returned with its buffered body, so that it can still be
/// read by the rest of the handling chain.
/// If the request already carries a [`Params`] store, it is kept as-is.
///
/// # Errors
///
/// Fails if the body can't be buffered, e.g. because it exceeds
/// [`ParamsConfig::body_size_limit`].
///
/// # Example
///
/// ```rust
/// use pavex_params::{ParamsConfig, get_params, parse_request};
/// use pavex_params::request::path::PathVariables;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let request = http::Request::builder()
///     .uri("/homes?city=Rome")
///     .body(http_body_util::Empty::<bytes::Bytes>::new())
///     .unwrap();
/// let path_variables: PathVariables = [("home_id", "42")].into_iter().collect();
///
/// let request = parse_request(request, &path_variables, &ParamsConfig::default())
///     .await
///     .unwrap();
/// let params = get_params(&request).unwrap();
/// assert_eq!(params.get_string("city").as_deref(), Some("Rome"));
/// assert_eq!(params.get_u64("home_id"), Some(42));
/// # });
/// ```
pub async fn parse_request<B>(
    request: http::Request<B>,
    path_variables: &PathVariables,
    config: &ParamsConfig,
) -> Result<http::Request<Bytes>, ExtractBufferedBodyError>
where
    B: http_body::Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (mut parts, body) = request.into_parts();
    let request_head = RequestHead {
        method: parts.method.clone(),
        target: parts.uri.clone(),
        version: parts.version,
        headers: parts.headers.clone(),
    };
    let body = BufferedBody::extract(&request_head, body, config.body_size_limit).await?;
    if parts.extensions.get::<Params>().is_none() {
        let params = Params::extract(&request_head, &body, path_variables, config).await;
        parts.extensions.insert(params);
    }
    Ok(http::Request::from_parts(parts, body.bytes))
}

/// Retrieve the [`Params`] attached to a request by [`parse_request`].
pub fn get_params<B>(request: &http::Request<B>) -> Option<&Params> {
    request.extensions().get::<Params>()
}

/// Like [`get_params`], but returns a mutable reference.
///
/// Required by the accessors that cache their result, e.g. [`Params::get_bytes`].
pub fn get_params_mut<B>(request: &mut http::Request<B>) -> Option<&mut Params> {
    request.extensions_mut().get_mut::<Params>()
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::HeaderMap;

    use crate::config::ParamsConfig;
    use crate::request::RequestHead;
    use crate::request::body::BufferedBody;
    use crate::request::path::PathVariables;
    use crate::store::Params;
    use crate::value::Value;

    use super::path_variable;

    fn head(method: http::Method, target: &str, content_type: &str) -> RequestHead {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::CONTENT_TYPE, content_type.parse().unwrap());
        RequestHead {
            method,
            target: target.parse().unwrap(),
            version: http::Version::HTTP_11,
            headers,
        }
    }

    #[test]
    fn numeric_id_path_variables() {
        assert_eq!(path_variable("id", "42"), Value::Uint(42));
        assert_eq!(path_variable("user_id", "7"), Value::Uint(7));
        assert_eq!(path_variable("id", "abc"), Value::from("abc"));
        assert_eq!(path_variable("id", "-1"), Value::from("-1"));
        assert_eq!(path_variable("id", "+42"), Value::from("+42"));
        // The match on `id` is case-sensitive.
        assert_eq!(path_variable("ID", "42"), Value::from("42"));
        assert_eq!(path_variable("page", "42"), Value::from("42"));
    }

    #[tokio::test]
    async fn malformed_json_falls_back_to_the_query_string() {
        let head = head(http::Method::POST, "/test?page=2", "application/json");
        let body = BufferedBody::from(Bytes::from_static(b"{\"broken\": "));

        let params = Params::extract(
            &head,
            &body,
            &PathVariables::new(),
            &ParamsConfig::default(),
        )
        .await;
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("page"), Some(&Value::from("2")));
    }

    #[tokio::test]
    async fn empty_msgpack_body_still_yields_the_query_string() {
        let head = head(http::Method::POST, "/test?page=2", "application/x-msgpack");

        let params = Params::extract(
            &head,
            &BufferedBody::default(),
            &PathVariables::new(),
            &ParamsConfig::default(),
        )
        .await;
        assert_eq!(params.get_int("page"), Some(2));
    }
}
