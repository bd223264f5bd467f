//! 生成管理员密码哈希

use std::io::{self, BufRead, IsTerminal, Write};

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::utils::password::hash_password;

/// 交互式输入密码（带确认）
fn prompt_password_with_confirm() -> Result<String, CliError> {
    if !io::stdin().is_terminal() {
        return Err(CliError::InputError(
            "No terminal available. Use --stdin to pipe the password.".to_string(),
        ));
    }

    let read = |prompt: &str| -> Result<String, CliError> {
        print!("{}", prompt);
        io::stdout()
            .flush()
            .map_err(|e| CliError::InputError(e.to_string()))?;
        rpassword::read_password()
            .map_err(|e| CliError::InputError(format!("Failed to read password: {}", e)))
    };

    let password = read("Enter password: ")?;
    let confirm = read("Confirm password: ")?;
    if password != confirm {
        return Err(CliError::InputError("Passwords do not match".to_string()));
    }
    Ok(password)
}

fn read_password_from_stdin() -> Result<String, CliError> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| CliError::InputError(format!("Failed to read from stdin: {}", e)))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub fn hash_password_command(stdin: bool) -> Result<(), CliError> {
    let password = if stdin {
        read_password_from_stdin()?
    } else {
        prompt_password_with_confirm()?
    };

    if password.is_empty() {
        return Err(CliError::InputError("Password must not be empty".to_string()));
    }

    let hash = hash_password(&password).map_err(|e| CliError::CommandError(e.to_string()))?;

    eprintln!(
        "{}",
        "Put this value into [admin] password in config.toml:".green()
    );
    println!("{}", hash);
    Ok(())
}
