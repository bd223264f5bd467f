//! Public endpoints
//!
//! The page data, visit recording, click-through redirects and uploaded
//! images. None of these require a session.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::services::{
    ClickOutcome, PublicPageService, SortKey, SortOrder, TrackingService, UploadService,
};

use super::admin::{ErrorCode, api_result, error_from_linkpage, json_response};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicPageQuery {
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub order: SortOrder,
}

#[derive(Debug, Clone, Serialize)]
pub struct LockedLink {
    pub link_id: i32,
    pub open_at: DateTime<Utc>,
}

pub struct PublicService;

impl PublicService {
    pub async fn page(
        query: web::Query<PublicPageQuery>,
        service: web::Data<PublicPageService>,
    ) -> ActixResult<impl Responder> {
        trace!("Public page requested: sort={} order={}", query.sort, query.order);
        Ok(api_result(
            service.page(query.sort, query.order, Utc::now()).await,
        ))
    }

    /// One visit per page load. Failures are reported but carry no detail.
    pub async fn record_visit(tracking: web::Data<TrackingService>) -> ActixResult<HttpResponse> {
        match tracking.record_visit(Utc::now()).await {
            Ok(()) => Ok(HttpResponse::NoContent().finish()),
            Err(e) => {
                warn!("Failed to record visit: {}", e);
                Ok(HttpResponse::ServiceUnavailable().finish())
            }
        }
    }

    /// `GET /go/{id}`: 302 to the target, 423 while scheduled, 404 otherwise
    pub async fn click_through(
        path: web::Path<i32>,
        tracking: web::Data<TrackingService>,
    ) -> ActixResult<HttpResponse> {
        let link_id = path.into_inner();
        match tracking.click_through(link_id, Utc::now()).await {
            Ok(ClickOutcome::Redirect(url)) => {
                debug!("Redirecting link {} to {}", link_id, url);
                Ok(HttpResponse::Found()
                    .insert_header(("Location", url))
                    .insert_header(("Cache-Control", "no-store"))
                    .finish())
            }
            Ok(ClickOutcome::Locked { open_at }) => Ok(json_response(
                StatusCode::LOCKED,
                ErrorCode::LinkLocked,
                format!("Link opens at {}", open_at.to_rfc3339()),
                Some(LockedLink { link_id, open_at }),
            )),
            Err(e) => Ok(error_from_linkpage(&e)),
        }
    }

    pub async fn uploaded_file(
        path: web::Path<String>,
        uploads: web::Data<UploadService>,
    ) -> ActixResult<HttpResponse> {
        let name = path.into_inner();
        let Some(file_path) = uploads.stored_path(&name) else {
            return Ok(HttpResponse::NotFound().body("File not found"));
        };

        match tokio::fs::read(&file_path).await {
            Ok(data) => Ok(HttpResponse::Ok()
                .content_type(content_type_for(&name))
                .insert_header(("Cache-Control", "public, max-age=31536000, immutable"))
                .body(data)),
            Err(e) => {
                debug!("Upload {} not readable: {}", name, e);
                Ok(HttpResponse::NotFound().body("File not found"))
            }
        }
    }
}

/// Content-Type by file extension
pub(crate) fn content_type_for(path: &str) -> &'static str {
    match path
        .rsplit('.')
        .next()
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

pub fn public_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/public", web::get().to(PublicService::page))
        .route("/api/visit", web::post().to(PublicService::record_visit))
        .route("/go/{id}", web::get().to(PublicService::click_through))
        .route("/uploads/{file}", web::get().to(PublicService::uploaded_file));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a.PNG"), "image/png");
        assert_eq!(content_type_for("x.svg"), "image/svg+xml");
        assert_eq!(content_type_for("app.js"), "application/javascript");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
