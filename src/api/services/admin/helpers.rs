//! Admin API 帮助函数

use actix_web::cookie::{Cookie, SameSite};
use actix_web::error::{InternalError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse};
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::analytics::TimeRange;
use crate::api::constants;
use crate::config::SameSitePolicy;
use crate::errors::{LinkpageError, Result};
use crate::utils::{parse_client_date, parse_range_end};

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 解析查询参数中的时间范围
///
/// 两端都缺省时返回 None（由调用方决定默认窗口）；只给一端视为参数错误。
/// 结束日期只有日期部分时包含当天全天。
pub fn parse_range_params(
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<Option<TimeRange>> {
    let start_date = start_date.map(str::trim).filter(|s| !s.is_empty());
    let end_date = end_date.map(str::trim).filter(|s| !s.is_empty());

    match (start_date, end_date) {
        (None, None) => Ok(None),
        (Some(start), Some(end)) => {
            let start = parse_client_date(start)?;
            let end = parse_range_end(end)?;
            TimeRange::new(start, end).map(Some)
        }
        _ => Err(LinkpageError::validation(
            "start_date and end_date must be given together",
        )),
    }
}

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 构建 201 Created 响应
pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, ErrorCode::Success, "Created", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 查询串无法反序列化时同样返回统一信封
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = err.to_string();
    tracing::debug!("Rejected query string: {}", message);
    let resp = error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message);
    InternalError::from_response(err, resp).into()
}

/// 从 LinkpageError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
///
/// 服务端错误只返回笼统信息，细节写日志。
pub fn error_from_linkpage(err: &LinkpageError) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        tracing::error!("{}", err);
        let message = match err {
            LinkpageError::DataUnavailable(_) => "Analytics data is unavailable",
            _ => "Internal server error",
        };
        return error_response(status, ErrorCode::from(err), message);
    }
    error_response(status, ErrorCode::from(err), err.message())
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 LinkpageError。
pub fn api_result<T, E>(result: std::result::Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<LinkpageError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_linkpage(&e.into()),
    }
}

/// 会话 Cookie 构建器
pub struct CookieBuilder {
    same_site: SameSite,
    secure: bool,
    session_minutes: u64,
}

impl CookieBuilder {
    pub fn from_config() -> Self {
        let config = crate::config::get_config();

        let same_site = match config.admin.cookie_same_site {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::Lax => SameSite::Lax,
        };

        Self {
            same_site,
            secure: config.admin.cookie_secure,
            session_minutes: config.admin.session_minutes,
        }
    }

    fn build_cookie_base(
        &self,
        value: String,
        max_age: actix_web::cookie::time::Duration,
    ) -> Cookie<'static> {
        let mut cookie = Cookie::new(constants::SESSION_COOKIE_NAME, value);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_secure(self.secure);
        cookie.set_same_site(self.same_site);
        cookie.set_max_age(max_age);
        cookie
    }

    pub fn build_session_cookie(&self, token: String) -> Cookie<'static> {
        self.build_cookie_base(
            token,
            actix_web::cookie::time::Duration::minutes(self.session_minutes as i64),
        )
    }

    pub fn build_expired_session_cookie(&self) -> Cookie<'static> {
        self.build_cookie_base(String::new(), actix_web::cookie::time::Duration::ZERO)
    }

    pub fn session_minutes(&self) -> u64 {
        self.session_minutes
    }
}
