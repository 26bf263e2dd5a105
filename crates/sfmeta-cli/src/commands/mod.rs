//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod cache;
pub mod parse;
pub mod push;
pub mod status;
pub mod sync;
pub mod templates;
