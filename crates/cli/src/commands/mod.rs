//! CLI subcommands

pub mod evaluation;
pub mod predict;
pub mod status;
