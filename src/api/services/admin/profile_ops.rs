//! Admin API 个人资料端点

use actix_web::{Responder, Result as ActixResult, web};
use tracing::{info, trace};

use crate::services::ProfileService;
use crate::storage::ProfileUpdate;

use super::helpers::api_result;

/// 获取个人资料（不存在时创建默认资料）
pub async fn get_profile(service: web::Data<ProfileService>) -> ActixResult<impl Responder> {
    trace!("Admin API: get profile");
    Ok(api_result(service.get_profile().await))
}

/// 更新个人资料；提供 social_links 时整体替换
pub async fn update_profile(
    body: web::Json<ProfileUpdate>,
    service: web::Data<ProfileService>,
) -> ActixResult<impl Responder> {
    let result = service.update_profile(body.into_inner()).await;
    if result.is_ok() {
        info!("Admin API: profile updated");
    }
    Ok(api_result(result))
}
