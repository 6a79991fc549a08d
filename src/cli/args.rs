//! CLI argument definitions using clap
//!
//! Commands:
//! - dynaform session [--config <path>] [--schema <path>]
//! - dynaform submit --schema <path> --values <path> [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// dynaform - build a form schema and fill it in, one JSON command per line
#[derive(Parser, Debug)]
#[command(name = "dynaform")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run an interactive builder/fill session over stdin/stdout
    Session {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Schema snapshot to start from (empty schema otherwise)
        #[arg(long)]
        schema: Option<PathBuf>,
    },

    /// Validate and submit a values file against a schema, then exit
    Submit {
        /// Schema snapshot
        #[arg(long)]
        schema: PathBuf,

        /// JSON object of field id -> value
        #[arg(long)]
        values: PathBuf,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
