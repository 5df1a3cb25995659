//! The parts of an incoming request that parameters are extracted from.
pub use request_head::RequestHead;

pub mod body;
pub mod path;
mod request_head;
