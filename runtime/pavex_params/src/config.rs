use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::request::body::BodySizeLimit;
use crate::value::Value;

#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default)]
#[non_exhaustive]
/// Configuration for [`Params::extract`](crate::Params::extract),
/// [`parse_request`](crate::parse_request) and [`Params::imbue`](crate::Params::imbue).
///
/// Every field is optional when deserializing: a missing field takes its default value.
///
/// # Example
///
/// ```rust
/// use pavex_params::ParamsConfig;
///
/// let config: ParamsConfig = serde_json::from_str(r#"
/// {
///     "filtered_keys": ["password", "card_number"],
///     "body_size_limit": { "enabled": { "max_size": "2 MiB" } }
/// }
/// "#).unwrap();
/// assert_eq!(config.filtered_keys, ["password", "card_number"]);
/// ```
pub struct ParamsConfig {
    /// Keys whose value must never show up in logs, compared case-insensitively.
    ///
    /// Their values are replaced by `["FILTERED"]` when the parsed parameters are logged.
    pub filtered_keys: Vec<String>,
    /// The maximum size of a request body buffered by [`parse_request`](crate::parse_request).
    pub body_size_limit: BodySizeLimit,
    /// Invoked by [`Params::imbue`](crate::Params::imbue) for fields that were registered
    /// via [`Fields::custom`](crate::Fields::custom).
    ///
    /// If it's not set, those fields are left untouched.
    #[serde(skip)]
    pub custom_type_handler: Option<CustomTypeHandler>,
}

impl ParamsConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set [`ParamsConfig::filtered_keys`].
    pub fn filtered_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filtered_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set [`ParamsConfig::body_size_limit`].
    pub fn body_size_limit(mut self, limit: BodySizeLimit) -> Self {
        self.body_size_limit = limit;
        self
    }

    /// Set [`ParamsConfig::custom_type_handler`].
    pub fn custom_type_handler(mut self, handler: CustomTypeHandler) -> Self {
        self.custom_type_handler = Some(handler);
        self
    }
}

type HandlerFn = dyn Fn(&str, &mut dyn Any, &Value) + Send + Sync;

#[derive(Clone)]
/// A callback that populates fields of a type [`Params::imbue`](crate::Params::imbue)
/// doesn't know how to handle.
///
/// It receives the name of the field, a type-erased reference to it and the
/// stored value. Use [`Any::downcast_mut`] to recover the concrete type of the field.
///
/// # Example
///
/// ```rust
/// use std::net::IpAddr;
/// use pavex_params::{CustomTypeHandler, Value};
///
/// let handler = CustomTypeHandler::new(|_name, field, value| {
///     if let (Some(ip), Value::String(raw)) = (field.downcast_mut::<Option<IpAddr>>(), value) {
///         *ip = raw.parse().ok();
///     }
/// });
/// # let _ = handler;
/// ```
pub struct CustomTypeHandler(Arc<HandlerFn>);

impl CustomTypeHandler {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&str, &mut dyn Any, &Value) + Send + Sync + 'static,
    {
        Self(Arc::new(handler))
    }

    pub(crate) fn call(&self, field_name: &str, field: &mut dyn Any, value: &Value) {
        (self.0)(field_name, field, value)
    }
}

impl fmt::Debug for CustomTypeHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CustomTypeHandler").field(&"<closure>").finish()
    }
}
