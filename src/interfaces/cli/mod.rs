//! CLI interface module
//!
//! One-shot commands that run instead of the server.

pub mod commands;

use std::fmt;

use crate::cli::Commands;
use crate::storage::StorageFactory;
use commands::{config_generate, hash_password_command, seed_command};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    InputError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::InputError(msg) => format!("Input error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::InputError(msg) => {
                format!("{} {}", "Input error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::LinkpageError> for CliError {
    fn from(err: crate::errors::LinkpageError) -> Self {
        CliError::StorageError(err.to_string())
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: &Commands) -> Result<(), CliError> {
    match cmd {
        Commands::GenerateConfig { output_path, force } => {
            config_generate(output_path.as_deref(), *force)
        }
        Commands::HashPassword { stdin } => hash_password_command(*stdin),
        Commands::Seed => {
            let storage = StorageFactory::create().await?;
            seed_command(storage).await
        }
        Commands::Serve => Err(CliError::CommandError(
            "serve is not a one-shot command".to_string(),
        )),
    }
}
