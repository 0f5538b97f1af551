//! Shared functionality
//!
//! Character sources, source locations and the error types used by the tokenizer, parser and
//! grammar matcher crates.

pub mod data_source;
pub mod errors;
pub mod location;
