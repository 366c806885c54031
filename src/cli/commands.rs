//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Next-page locator for saved HTML snapshots
#[derive(Parser, Debug)]
#[command(name = "pagewalk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// HTML snapshot of the rendered page
    #[arg(long, global = true)]
    pub html: Option<PathBuf>,

    /// URL the snapshot was taken at (relative links resolve against it)
    #[arg(short, long, global = true, default_value = "http://localhost/")]
    pub location: String,

    /// Locator configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find the next-page control
    Locate {
        /// Report every strategy's result instead of only the winner
        #[arg(long)]
        explain: bool,
    },

    /// Report current/total page and next/previous availability
    Inspect,

    /// Check for explicit infinite-scroll markup
    Probe,

    /// Locate and advance against the snapshot (dry run)
    Advance {
        /// Override the content wait in milliseconds
        #[arg(long)]
        max_wait_ms: Option<u64>,
    },

    /// Print the built-in configuration as YAML
    Defaults,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    Pretty,
}
