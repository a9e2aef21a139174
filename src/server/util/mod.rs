//! Small helpers shared across layers: request value parsing and input validation.

pub mod parse;
pub mod validate;
