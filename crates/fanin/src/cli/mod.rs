//! Command-line surface

pub mod commands;
pub mod handlers;

pub use commands::build_cli;
