pub mod auth;
pub mod request_id;
pub mod session_reset;

pub use auth::AdminAuth;
pub use request_id::{RequestId, RequestIdMiddleware};
pub use session_reset::reset_admin_session;
