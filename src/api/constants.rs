//! API 模块常量定义

/// 管理员会话 Cookie 名称
pub const SESSION_COOKIE_NAME: &str = "linkpage_session";

/// 管理 API 前缀（版本号在路由中追加）
pub const ADMIN_API_PREFIX: &str = "/admin/api";

/// 会话 token 的 sub 字段
pub const ADMIN_SUBJECT: &str = "admin";
