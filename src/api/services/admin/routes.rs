//! Admin API 路由配置
//!
//! 将 /v1 下的路由按功能模块拆分。

use actix_web::web;

use super::analytics::get_stats;
use super::auth::{login, login_rate_limiter, logout, verify_session};
use super::group_ops::{create_group, delete_group, list_groups, set_group_links, update_group};
use super::link_ops::{create_link, delete_link, get_link, link_stats, list_links, update_link};
use super::profile_ops::{get_profile, update_profile};
use super::upload::upload_image;

/// 认证路由 `/auth`
///
/// - POST /auth/login - 登录（带限流）
/// - POST /auth/logout - 登出
/// - GET /auth/verify - 验证会话
pub fn auth_routes() -> actix_web::Scope {
    web::scope("/auth")
        .route("/login", web::post().to(login).wrap(login_rate_limiter()))
        .route("/logout", web::post().to(logout))
        .route("/verify", web::get().to(verify_session))
}

pub fn profile_routes() -> actix_web::Scope {
    web::scope("/profile")
        .route("", web::get().to(get_profile))
        .route("", web::put().to(update_profile))
}

/// 链接管理路由 `/links`
///
/// `/links/{id}/stats` 必须在 `/links/{id}` 之前注册
pub fn links_routes() -> actix_web::Scope {
    web::scope("/links")
        .route("", web::get().to(list_links))
        .route("", web::post().to(create_link))
        .route("/{id}/stats", web::get().to(link_stats))
        .route("/{id}", web::get().to(get_link))
        .route("/{id}", web::put().to(update_link))
        .route("/{id}", web::delete().to(delete_link))
}

pub fn groups_routes() -> actix_web::Scope {
    web::scope("/groups")
        .route("", web::get().to(list_groups))
        .route("", web::post().to(create_group))
        .route("/{id}/links", web::put().to(set_group_links))
        .route("/{id}", web::put().to(update_group))
        .route("/{id}", web::delete().to(delete_group))
}

/// Admin API v1 路由
pub fn admin_v1_routes() -> actix_web::Scope {
    web::scope("/v1")
        .service(auth_routes())
        .service(profile_routes())
        .service(links_routes())
        .service(groups_routes())
        .route("/stats", web::get().to(get_stats))
        .route("/upload", web::post().to(upload_image))
}
