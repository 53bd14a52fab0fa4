//! Wipe command-line runner.
//!
//! Loads a document snapshot, builds the action registry for it and runs
//! actions by name or in dependency order.

pub mod cli;
pub mod render;

pub use cli::{execute, Cli, CliError, Command};
