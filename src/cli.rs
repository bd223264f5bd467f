//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// linkpage - a self-hosted link-in-bio page
#[derive(Parser, Debug)]
#[command(name = "linkpage")]
#[command(version)]
#[command(about = "A self-hosted link-in-bio page", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Generate an example configuration file
    GenerateConfig {
        /// Output path (default: stdout)
        output_path: Option<String>,

        /// Overwrite without confirmation
        #[arg(long)]
        force: bool,
    },

    /// Hash an admin password for `admin.password`
    HashPassword {
        /// Read the password from stdin instead of prompting
        #[arg(long)]
        stdin: bool,
    },

    /// Replace links and groups with demo data
    Seed,
}

impl Cli {
    /// The command to run, `serve` when none is given
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Serve)
    }
}
