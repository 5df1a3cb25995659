use bytes::Bytes;
use futures_util::future::ready;
use futures_util::stream::once;
use http::Method;
use tracing_log_error::log_error;

use crate::request::RequestHead;
use crate::request::body::BufferedBody;
use crate::value::{Map, UploadedFile, Value};

use super::BodyEncoding;
use super::errors::MultipartBodyError;

/// Collect the query string and, for form-encoded bodies, the form fields.
///
/// Only the first value of each field is kept. The literals `true` and `false`
/// (case-insensitive) become booleans, everything else is kept as a string.
///
/// - A `application/x-www-form-urlencoded` body is only read for `POST`, `PUT` and
///   `PATCH` requests. Its fields take precedence over the query string.
/// - For a `multipart/form-data` body, the query string takes precedence over text fields.
///   Uploaded files are stored as [`Value::File`], overriding any text field with the same
///   name. Only the first file for each field is kept.
///   If the body can't be parsed, only the query string is used.
pub async fn form(request_head: &RequestHead, body: &BufferedBody) -> Map {
    let query = request_head.target.query().unwrap_or_default();
    let query_pairs = form_urlencoded::parse(query.as_bytes());

    let mut values = Map::new();
    match BodyEncoding::detect(request_head) {
        BodyEncoding::UrlEncoded if has_form_body(&request_head.method) => {
            let body_pairs = form_urlencoded::parse(&body.bytes);
            insert_first(&mut values, body_pairs.chain(query_pairs));
        }
        BodyEncoding::Multipart => {
            insert_first(&mut values, query_pairs);
            let content_type = request_head.content_type().unwrap_or_default();
            match multipart(content_type, body.bytes.clone()).await {
                Ok(form) => {
                    insert_first(&mut values, form.fields);
                    for file in form.files {
                        values.insert(file.field_name.clone(), Value::File(file));
                    }
                }
                Err(e) => {
                    log_error!(
                        e,
                        level: tracing::Level::WARN,
                        "Failed to parse the multipart body, ignoring it"
                    );
                }
            }
        }
        _ => insert_first(&mut values, query_pairs),
    }
    values
}

fn has_form_body(method: &Method) -> bool {
    method == Method::POST || method == Method::PUT || method == Method::PATCH
}

fn insert_first<I, K, V>(values: &mut Map, pairs: I)
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: AsRef<str>,
{
    for (key, value) in pairs {
        values
            .entry(key.into())
            .or_insert_with(|| form_value(value.as_ref()));
    }
}

fn form_value(raw: &str) -> Value {
    if raw.eq_ignore_ascii_case("true") {
        Value::Bool(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Value::Bool(false)
    } else {
        Value::String(raw.to_owned())
    }
}

#[derive(Default)]
struct MultipartForm {
    fields: Vec<(String, String)>,
    files: Vec<UploadedFile>,
}

async fn multipart(content_type: &str, body: Bytes) -> Result<MultipartForm, MultipartBodyError> {
    let boundary = multer::parse_boundary(content_type)?;
    let stream = once(ready(Ok::<_, std::io::Error>(body)));
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut form = MultipartForm::default();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        match field.file_name().map(str::to_owned) {
            Some(file_name) => {
                if form.files.iter().any(|file| file.field_name == name) {
                    continue;
                }
                let content_type = field.content_type().cloned();
                let bytes = field.bytes().await?;
                form.files.push(UploadedFile {
                    field_name: name,
                    file_name: Some(file_name),
                    content_type,
                    bytes,
                });
            }
            None => {
                let text = field.text().await?;
                form.fields.push((name, text));
            }
        }
    }
    Ok(form)
}
