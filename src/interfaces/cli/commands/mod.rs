//! CLI command implementations

mod config_gen;
mod hash_password;
mod seed;

pub use config_gen::config_generate;
pub use hash_password::hash_password_command;
pub use seed::seed_command;
