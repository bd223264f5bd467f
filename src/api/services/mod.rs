pub mod admin;
pub mod frontend;
pub mod health;
pub mod public;

pub use frontend::{FrontendService, frontend_routes};
pub use health::{AppStartTime, HealthService, health_routes};
pub use public::{PublicService, public_routes};
