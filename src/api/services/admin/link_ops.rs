//! Admin API 链接 CRUD 与单链接统计

use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use chrono::Utc;
use tracing::{info, trace};

use crate::services::{AnalyticsService, CreateLinkRequest, LinkService, UpdateLinkRequest};

use super::helpers::{
    api_result, created_response, error_from_linkpage, parse_range_params, success_response,
};
use super::types::{LinkStatsQuery, MessageResponse};

/// 获取所有链接（按 order 排序，包括停用的）
pub async fn list_links(service: web::Data<LinkService>) -> ActixResult<impl Responder> {
    trace!("Admin API: list links");
    Ok(api_result(service.list_links().await))
}

pub async fn get_link(
    path: web::Path<i32>,
    service: web::Data<LinkService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(service.get_link(path.into_inner()).await))
}

pub async fn create_link(
    body: web::Json<CreateLinkRequest>,
    service: web::Data<LinkService>,
) -> ActixResult<HttpResponse> {
    match service.create_link(body.into_inner()).await {
        Ok(link) => {
            info!("Admin API: link created: {} ({})", link.id, link.title);
            Ok(created_response(link))
        }
        Err(e) => Ok(error_from_linkpage(&e)),
    }
}

pub async fn update_link(
    path: web::Path<i32>,
    body: web::Json<UpdateLinkRequest>,
    service: web::Data<LinkService>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    let result = service.update_link(id, body.into_inner()).await;
    if result.is_ok() {
        info!("Admin API: link updated: {}", id);
    }
    Ok(api_result(result))
}

pub async fn delete_link(
    path: web::Path<i32>,
    service: web::Data<LinkService>,
) -> ActixResult<HttpResponse> {
    let id = path.into_inner();
    match service.delete_link(id).await {
        Ok(()) => {
            info!("Admin API: link deleted: {}", id);
            Ok(success_response(MessageResponse {
                message: format!("Link {} deleted", id),
            }))
        }
        Err(e) => Ok(error_from_linkpage(&e)),
    }
}

/// 单链接点击统计
///
/// 未指定区间时按粒度取默认窗口（hour=24 小时 … year=5 年）
pub async fn link_stats(
    path: web::Path<i32>,
    query: web::Query<LinkStatsQuery>,
    analytics: web::Data<AnalyticsService>,
) -> ActixResult<HttpResponse> {
    let id = path.into_inner();
    let range = match parse_range_params(query.start_date.as_deref(), query.end_date.as_deref()) {
        Ok(range) => range,
        Err(e) => return Ok(error_from_linkpage(&e)),
    };

    trace!(
        "Admin API: stats for link {} ({}, {:?})",
        id, query.granularity, range
    );
    Ok(api_result(
        analytics
            .link_statistics(id, query.granularity, range, Utc::now())
            .await,
    ))
}
