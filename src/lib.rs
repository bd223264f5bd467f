//! Linkpage - a self-hosted link-in-bio page
//!
//! One public page lists the owner's links, grouped and ordered, with
//! scheduled visibility windows. An admin API manages the content and
//! reports visit and click statistics.
//!
//! # Architecture
//! - `services`: visibility resolution, content management, tracking
//! - `analytics`: event store and time-bucket aggregation
//! - `storage`: SeaORM backend and domain models
//! - `api`: HTTP services and middleware
//! - `interfaces`: CLI commands
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging and panic handling

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
