//! Path variables, as extracted from the URL by your router.
pub use path_variables::PathVariables;

pub mod errors;
mod path_variables;
