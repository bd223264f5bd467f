//! Service layer
//!
//! Business logic shared by the HTTP handlers and the CLI.

mod analytics_service;
mod link_service;
mod profile_service;
pub mod public_page;
mod seed;
mod tracking;
mod upload_service;
pub mod visibility;

pub use analytics_service::*;
pub use link_service::*;
pub use profile_service::*;
pub use public_page::{PublicPage, PublicPageService, SortKey, SortOrder};
pub use seed::{SeedReport, seed_demo_data};
pub use tracking::{ClickOutcome, TrackingService};
pub use upload_service::*;
pub use visibility::{Visibility, resolve};
