//! CLI subcommands.

pub mod generate;
pub mod scenario;
