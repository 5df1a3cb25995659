//! # pavex_params
//!
//! Normalize every source of request parameters into a single, loosely-typed store.
//!
//! An incoming request can carry parameters in many places: the query string,
//! a `application/x-www-form-urlencoded` or `multipart/form-data` body,
//! a JSON or msgpack body, the path variables matched by your router.
//! [`Params::extract`] merges all of them into a [`Params`] store, which you can then
//! query with typed accessors ([`Params::get_int`], [`Params::get_time`],
//! [`Params::get_string_list`], ...) or use to populate a struct via [`Params::imbue`].
//!
//! Accessors never fail loudly: they return `None` (or a default value, for the
//! `*_or_default` variants) when a parameter is missing or can't be coerced.
//!
//! # Example
//!
//! ```rust
//! use pavex_params::{Params, ParamsConfig};
//! use pavex_params::request::RequestHead;
//! use pavex_params::request::body::BufferedBody;
//! use pavex_params::request::path::PathVariables;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let request = http::Request::post("/homes/42?page=2")
//!     .header("content-type", "application/json")
//!     .body(())
//!     .unwrap();
//! let (parts, _) = request.into_parts();
//! let head = RequestHead::from(parts);
//! let body = BufferedBody::from(bytes::Bytes::from_static(br#"{"coord": {"lat": 50.505}}"#));
//! let path_variables: PathVariables = [("home_id", "42")].into_iter().collect();
//!
//! let params = Params::extract(&head, &body, &path_variables, &ParamsConfig::default()).await;
//! assert_eq!(params.get_float("coord.lat"), Some(50.505));
//! assert_eq!(params.get_int("page"), Some(2));
//! assert_eq!(params.get_u64("home_id"), Some(42));
//! # });
//! ```
pub use config::{CustomTypeHandler, ParamsConfig};
pub use extract::{get_params, get_params_mut, parse_request};
pub use imbue::{Fields, Imbue};
pub use slices::unique_u64;
pub use store::Params;
pub use store::coerce::{DATE_ONLY, DATE_TIME, HTML_DATE_TIME_LOCAL};
pub use value::{Map, UploadedFile, Value};

mod config;
mod extract;
pub mod imbue;
pub mod ingest;
pub mod request;
mod slices;
mod store;
mod value;
