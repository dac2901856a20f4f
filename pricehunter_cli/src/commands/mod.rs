//! CLI subcommand implementations.

pub mod clean;
pub mod parse;
pub mod rates;
