//! 离开管理区自动登出
//!
//! 携带管理会话 Cookie 访问非 `/admin` 路径时，在响应中清除该 Cookie。
//! 静态资源不受影响。

use actix_web::{
    Error, HttpMessage,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};
use tracing::debug;

use crate::api::constants::SESSION_COOKIE_NAME;
use crate::api::services::admin::CookieBuilder;

fn keeps_session(path: &str) -> bool {
    path.starts_with("/admin") || path.starts_with("/static/") || path == "/favicon.ico"
}

pub async fn reset_admin_session(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let clear = !keeps_session(req.path()) && req.cookie(SESSION_COOKIE_NAME).is_some();
    let path = req.path().to_string();

    let mut res = next.call(req).await?;

    if clear {
        debug!("Clearing admin session on public path {}", path);
        let expired = CookieBuilder::from_config().build_expired_session_cookie();
        res.response_mut().add_cookie(&expired)?;
    }

    Ok(res)
}
