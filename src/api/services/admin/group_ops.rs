//! Admin API 分组端点

use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use tracing::info;

use crate::services::LinkService;
use crate::storage::{GroupPatch, NewGroup};

use super::helpers::{api_result, created_response, error_from_linkpage, success_response};
use super::types::{GroupLinksRequest, MessageResponse};

/// 所有分组及其链接 id
pub async fn list_groups(service: web::Data<LinkService>) -> ActixResult<impl Responder> {
    Ok(api_result(service.list_groups().await))
}

pub async fn create_group(
    body: web::Json<NewGroup>,
    service: web::Data<LinkService>,
) -> ActixResult<HttpResponse> {
    match service.create_group(body.into_inner()).await {
        Ok(group) => {
            info!("Admin API: group created: {} ({})", group.id, group.name);
            Ok(created_response(group))
        }
        Err(e) => Ok(error_from_linkpage(&e)),
    }
}

pub async fn update_group(
    path: web::Path<i32>,
    body: web::Json<GroupPatch>,
    service: web::Data<LinkService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        service.update_group(path.into_inner(), body.into_inner()).await,
    ))
}

/// 删除分组，组内链接变为未分组
pub async fn delete_group(
    path: web::Path<i32>,
    service: web::Data<LinkService>,
) -> ActixResult<HttpResponse> {
    let id = path.into_inner();
    match service.delete_group(id).await {
        Ok(()) => Ok(success_response(MessageResponse {
            message: format!("Group {} deleted", id),
        })),
        Err(e) => Ok(error_from_linkpage(&e)),
    }
}

/// 整体替换分组成员
pub async fn set_group_links(
    path: web::Path<i32>,
    body: web::Json<GroupLinksRequest>,
    service: web::Data<LinkService>,
) -> ActixResult<HttpResponse> {
    let id = path.into_inner();
    match service.set_group_links(id, &body.link_ids).await {
        Ok(()) => Ok(success_response(MessageResponse {
            message: format!("Group {} now holds {} links", id, body.link_ids.len()),
        })),
        Err(e) => Ok(error_from_linkpage(&e)),
    }
}
