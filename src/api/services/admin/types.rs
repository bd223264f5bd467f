//! Admin API 类型定义

use serde::{Deserialize, Serialize};

use crate::analytics::Granularity;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LoginCredentials {
    pub password: String,
}

/// 统一响应信封
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AuthSuccessResponse {
    pub message: String,
    /// 会话有效期（秒）
    pub expires_in: u64,
}

/// `GET /stats` 查询参数
///
/// 同时给出 start_date 和 end_date 时按区间统计，否则按 days 回溯。
#[derive(Deserialize, Clone, Debug, Default)]
pub struct StatsQuery {
    pub days: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// `GET /links/{id}/stats` 查询参数
#[derive(Deserialize, Clone, Debug, Default)]
pub struct LinkStatsQuery {
    #[serde(default)]
    pub granularity: Granularity,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// `PUT /groups/{id}/links` 请求体
#[derive(Deserialize, Clone, Debug)]
pub struct GroupLinksRequest {
    pub link_ids: Vec<i32>,
}
