//! CLI module
//!
//! Command-line interface for running the locator against saved snapshots.
//!
//! # Commands
//!
//! - `locate` - Find the next-page control
//! - `inspect` - Summarize the pagination state
//! - `probe` - Check for infinite-scroll markup
//! - `advance` - Dry-run a page transition
//! - `defaults` - Print the built-in configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
