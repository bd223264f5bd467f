//! Mode routing
//!
//! - Server mode (HTTP server), the default
//! - CLI mode (one-shot commands)

pub mod cli;
pub mod server;

pub use cli::run_cli;
pub use server::run_server;

use crate::cli::Commands;

/// Execution mode
#[derive(Debug, PartialEq, Eq)]
pub enum Mode {
    Server,
    Cli,
}

/// Pick the mode for a parsed command
pub fn detect_mode(command: &Commands) -> Mode {
    match command {
        Commands::Serve => Mode::Server,
        _ => Mode::Cli,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_mode() {
        assert_eq!(detect_mode(&Commands::Serve), Mode::Server);
        assert_eq!(detect_mode(&Commands::Seed), Mode::Cli);
        assert_eq!(detect_mode(&Commands::HashPassword { stdin: true }), Mode::Cli);
    }
}
