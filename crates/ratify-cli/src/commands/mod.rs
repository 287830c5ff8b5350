//! Subcommand implementations.

pub(crate) mod config;
pub(crate) mod evaluate;
pub(crate) mod meta;
