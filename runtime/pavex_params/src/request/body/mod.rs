//! Buffer the body of incoming requests ahead of parameter extraction.
//!
//! All ingestors need the entire body in memory. [`BufferedBody`] collects it while
//! enforcing a [`BodySizeLimit`], to avoid resource exhaustion attacks.
pub use buffered_body::BufferedBody;
pub use limit::BodySizeLimit;

mod buffered_body;
pub mod errors;
mod limit;
