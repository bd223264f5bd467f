//! Admin API 认证相关端点

use actix_governor::{Governor, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, Result as ActixResult, web};
use governor::middleware::NoOpMiddleware;
use tracing::{debug, error, info, warn};

use crate::api::jwt::get_jwt_service;
use crate::config::get_config;
use crate::utils::password::verify_admin_password;

use super::error_code::ErrorCode;
use super::helpers::{CookieBuilder, error_response, json_response, success_response};
use super::types::{AuthSuccessResponse, LoginCredentials, MessageResponse};

/// 基于连接 IP 的限流 key 提取器
///
/// 只使用 TCP peer address，不信任 X-Forwarded-For。
#[derive(Clone, Copy)]
pub struct LoginKeyExtractor;

impl KeyExtractor for LoginKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        let key = req
            .connection_info()
            .peer_addr()
            .unwrap_or("unknown")
            .to_string();
        debug!("Login rate limit key: {}", key);
        Ok(key)
    }
}

/// 创建登录限流器
///
/// 每秒补充 1 个令牌，突发最多 5 次请求，超限返回 HTTP 429
pub fn login_rate_limiter() -> Governor<LoginKeyExtractor, NoOpMiddleware> {
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(5)
        .key_extractor(LoginKeyExtractor)
        .finish()
        .expect("constant rate limit parameters are non-zero");

    debug!("Login rate limiter created: 1 req/s, burst 5");
    Governor::new(&config)
}

/// 登录：校验管理员密码并下发会话 Cookie
pub async fn login(
    _req: HttpRequest,
    login_body: web::Json<LoginCredentials>,
) -> ActixResult<impl Responder> {
    let config = get_config();

    let password_valid = match verify_admin_password(&login_body.password, &config.admin.password)
    {
        Ok(valid) => valid,
        Err(e) => {
            error!("Admin API: password verification error: {}", e);
            return Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Authentication error",
            ));
        }
    };

    if !password_valid {
        warn!("Admin API: login failed - invalid password");
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::AuthFailed,
            "Invalid password",
        ));
    }

    let token = match get_jwt_service().generate_session_token() {
        Ok(token) => token,
        Err(e) => {
            error!("Admin API: failed to generate session token: {}", e);
            return Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Failed to generate token",
            ));
        }
    };

    info!("Admin API: login successful");

    let cookie_builder = CookieBuilder::from_config();
    let mut response = json_response(
        StatusCode::OK,
        ErrorCode::Success,
        "OK",
        Some(AuthSuccessResponse {
            message: "Login successful".to_string(),
            expires_in: cookie_builder.session_minutes() * 60,
        }),
    );
    if let Err(e) = response.add_cookie(&cookie_builder.build_session_cookie(token)) {
        error!("Admin API: failed to set session cookie: {}", e);
        return Ok(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
            "Failed to set session",
        ));
    }
    Ok(response)
}

/// 登出 - 清除会话 Cookie
pub async fn logout(_req: HttpRequest) -> ActixResult<impl Responder> {
    info!("Admin API: logout");

    let cookie_builder = CookieBuilder::from_config();
    Ok(HttpResponse::Ok()
        .cookie(cookie_builder.build_expired_session_cookie())
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(super::types::ApiResponse {
            code: ErrorCode::Success as i32,
            message: "OK".to_string(),
            data: Some(MessageResponse {
                message: "Logout successful".to_string(),
            }),
        }))
}

/// 验证会话 - 如果中间件通过，则会话有效
pub async fn verify_session(_req: HttpRequest) -> ActixResult<impl Responder> {
    Ok(success_response(MessageResponse {
        message: "Session is valid".to_string(),
    }))
}
