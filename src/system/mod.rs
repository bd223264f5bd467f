//! System-level modules
//!
//! - Logging initialization
//! - Panic hook (`logging.crash_log`)

pub mod logging;
pub mod panic_handler;
