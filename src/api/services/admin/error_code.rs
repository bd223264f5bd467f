//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::LinkpageError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 链接/分组错误
/// - 4000-4099: 上传错误
/// - 6000-6099: 统计错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    InvalidDateFormat = 1012,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    TokenInvalid = 2002,
    RateLimitExceeded = 2004,

    // 链接错误 3000-3099
    LinkNotFound = 3000,
    LinkLocked = 3007,

    // 上传错误 4000-4099
    UploadRejected = 4010,
    InvalidMultipartData = 4002,

    // Analytics 错误 6000-6099
    AnalyticsQueryFailed = 6000,
    AnalyticsInvalidDateRange = 6002,
}

impl From<&LinkpageError> for ErrorCode {
    fn from(err: &LinkpageError) -> Self {
        match err {
            LinkpageError::Validation(_) => ErrorCode::BadRequest,
            LinkpageError::DateParse(_) => ErrorCode::InvalidDateFormat,
            LinkpageError::NotFound(_) => ErrorCode::NotFound,
            LinkpageError::Unauthorized(_) => ErrorCode::Unauthorized,
            LinkpageError::DataUnavailable(_) => ErrorCode::AnalyticsQueryFailed,
            LinkpageError::InvalidRange(_) => ErrorCode::AnalyticsInvalidDateRange,
            LinkpageError::UploadRejected(_) => ErrorCode::UploadRejected,
            LinkpageError::DatabaseConfig(_)
            | LinkpageError::DatabaseConnection(_)
            | LinkpageError::DatabaseOperation(_)
            | LinkpageError::FileOperation(_)
            | LinkpageError::Serialization(_) => ErrorCode::InternalServerError,
        }
    }
}
