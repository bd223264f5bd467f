//! Logging system initialization
//!
//! Sets up tracing-subscriber according to the `[logging]` section:
//! console or file output, optional daily rotation, text or JSON format.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

use crate::config::StaticConfig;

const DEFAULT_LOG_NAME: &str = "linkpage.log";

/// Initialize logging system based on configuration
///
/// **Note**: This should be called only once during application startup,
/// after the configuration has been loaded.
///
/// # Returns
/// * `WorkerGuard` - Must be kept alive for the duration of the program
///   to ensure non-blocking log writes are flushed
pub fn init_logging(config: &StaticConfig) -> WorkerGuard {
    let log_file = config.logging.file.as_deref().filter(|f| !f.is_empty());
    let writer = build_writer(config, log_file);

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.logging.level.clone()));

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(log_file.is_none());

    // 重复初始化（例如测试中）不应导致 panic
    let result = if config.logging.format == "json" {
        subscriber_builder.json().try_init()
    } else {
        subscriber_builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("[WARN] Logging already initialized: {}", e);
    }

    guard
}

fn build_writer(
    config: &StaticConfig,
    log_file: Option<&str>,
) -> Box<dyn std::io::Write + Send + Sync> {
    let Some(log_file) = log_file else {
        return Box::new(std::io::stdout());
    };

    let path = std::path::Path::new(log_file);

    if config.logging.enable_rotation {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(std::path::Path::new("."));
        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(DEFAULT_LOG_NAME);

        match rolling::Builder::new()
            .rotation(rolling::Rotation::DAILY)
            .filename_prefix(filename.trim_end_matches(".log"))
            .filename_suffix("log")
            .max_log_files(config.logging.max_backups.max(1) as usize)
            .build(dir)
        {
            Ok(appender) => return Box::new(appender),
            Err(e) => {
                eprintln!(
                    "[ERROR] Failed to create rolling log appender in {}: {}, logging to stdout",
                    dir.display(),
                    e
                );
                return Box::new(std::io::stdout());
            }
        }
    }

    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
    {
        Ok(file) => Box::new(file),
        Err(e) => {
            eprintln!(
                "[ERROR] Failed to open log file {}: {}, logging to stdout",
                log_file, e
            );
            Box::new(std::io::stdout())
        }
    }
}
