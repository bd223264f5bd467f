//! Startup and shutdown

pub mod shutdown;
pub mod startup;
