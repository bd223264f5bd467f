//! Panic hook
//!
//! Every panic is appended to the crash log named by `logging.crash_log`.
//! The server prints the full report in color; CLI commands print one line.

use std::backtrace::Backtrace;
use std::fs::OpenOptions;
use std::io::Write;
use std::panic::{self, PanicHookInfo};
use std::path::{Path, PathBuf};

use chrono::Utc;
use colored::Colorize;

use crate::config::LoggingConfig;

/// Running mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Server,
    Cli,
}

/// What gets written to the crash log for one panic
#[derive(Debug)]
struct CrashReport {
    timestamp: String,
    message: String,
    location: String,
    backtrace: String,
}

impl CrashReport {
    fn capture(info: &PanicHookInfo<'_>) -> Self {
        let payload = info.payload();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "Unknown panic".to_string());

        let location = info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "Unknown location".to_string());

        Self {
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            message,
            location,
            backtrace: format!("{:?}", Backtrace::force_capture()),
        }
    }

    fn append_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        writeln!(file, "==========================================")?;
        writeln!(file, "linkpage crash report - {}", self.timestamp)?;
        writeln!(file, "==========================================")?;
        writeln!(file, "Message: {}", self.message)?;
        writeln!(file, "Location: {}", self.location)?;
        writeln!(file, "\nBacktrace:")?;
        writeln!(file, "{}", self.backtrace)?;
        writeln!(file, "==========================================\n")?;
        Ok(())
    }
}

/// Install the panic hook, writing reports to `logging.crash_log`
pub fn install_panic_hook(mode: RunMode, logging: &LoggingConfig) {
    let crash_log = PathBuf::from(&logging.crash_log);

    panic::set_hook(Box::new(move |info| {
        let report = CrashReport::capture(info);

        if let Err(e) = report.append_to(&crash_log) {
            eprintln!("Failed to write crash log {}: {}", crash_log.display(), e);
        }

        match mode {
            RunMode::Server => print_server_report(&report, &crash_log),
            RunMode::Cli => {
                eprintln!();
                eprintln!("linkpage panicked: {}", report.message);
                eprintln!("Details saved to {}", crash_log.display());
                eprintln!();
            }
        }
    }));
}

fn print_server_report(report: &CrashReport, crash_log: &Path) {
    let rule = "═══════════════════════════════════════════════════";
    eprintln!();
    eprintln!("{}", rule.red().bold());
    eprintln!("{}", "linkpage server panicked".red().bold());
    eprintln!("{}", rule.red().bold());
    eprintln!("{} {}", "Reason:".yellow().bold(), report.message.white());
    eprintln!("{} {}", "Location:".yellow().bold(), report.location.white());
    eprintln!();
    eprintln!("{}", "Backtrace:".yellow().bold());
    eprintln!("{}", report.backtrace.dimmed());
    eprintln!();
    eprintln!(
        "{}",
        format!("Details saved to {}", crash_log.display()).cyan()
    );
    eprintln!("{}", rule.red().bold());
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn report(message: &str) -> CrashReport {
        CrashReport {
            timestamp: "2024-03-01 12:00:00 UTC".to_string(),
            message: message.to_string(),
            location: "src/main.rs:1:1".to_string(),
            backtrace: "<disabled>".to_string(),
        }
    }

    #[test]
    fn test_reports_append_to_configured_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("panic.log");

        report("first").append_to(&path).unwrap();
        report("second").append_to(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Message: first"));
        assert!(written.contains("Message: second"));
        assert_eq!(written.matches("linkpage crash report").count(), 2);
    }
}
