//! Admin API 服务模块
//!
//! - 认证（登录、登出、会话校验）
//! - 个人资料
//! - 链接与分组 CRUD
//! - 统计
//! - 图片上传

pub mod analytics;
pub mod auth;
pub mod error_code;
mod group_ops;
mod helpers;
mod link_ops;
mod profile_ops;
pub mod routes;
mod types;
mod upload;

pub use types::*;

pub use helpers::{
    CookieBuilder, api_result, error_from_linkpage, error_response, json_response,
    parse_range_params, query_error_handler, success_response,
};

pub use error_code::ErrorCode;

pub use routes::admin_v1_routes;
