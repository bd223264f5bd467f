use actix_web::{HttpRequest, HttpResponse, Result, web};
use rust_embed::Embed;
use tracing::{debug, trace};

use super::public::content_type_for;
use crate::api::constants::ADMIN_API_PREFIX;

// 使用 RustEmbed 嵌入公开页面与管理页面
#[derive(Embed)]
#[folder = "static/"]
struct FrontendAssets;

pub struct FrontendService;

impl FrontendService {
    fn render_page(name: &str) -> HttpResponse {
        match FrontendAssets::get(name) {
            Some(content) => {
                let html = String::from_utf8_lossy(&content.data)
                    .replace("%ADMIN_API_PREFIX%", ADMIN_API_PREFIX)
                    .replace("%LINKPAGE_VERSION%", env!("CARGO_PKG_VERSION"));
                HttpResponse::Ok()
                    .content_type("text/html; charset=utf-8")
                    .body(html)
            }
            None => {
                debug!("Embedded page missing: {}", name);
                HttpResponse::NotFound().body("Not Found")
            }
        }
    }

    /// 公开主页
    pub async fn handle_index(_req: HttpRequest) -> Result<HttpResponse> {
        trace!("Serving public page");
        Ok(Self::render_page("index.html"))
    }

    /// 管理页面（登录前后同一页面，由脚本根据 /auth/verify 切换）
    pub async fn handle_admin_panel(_req: HttpRequest) -> Result<HttpResponse> {
        trace!("Serving admin page");
        Ok(Self::render_page("admin.html"))
    }

    /// 处理静态资源文件
    pub async fn handle_static(req: HttpRequest) -> Result<HttpResponse> {
        let path = req.match_info().query("path");
        trace!("Serving static file: {}", path);

        // 页面模板不走静态路由
        if path.ends_with(".html") {
            return Ok(HttpResponse::NotFound().body("File not found"));
        }

        match FrontendAssets::get(path) {
            Some(content) => Ok(HttpResponse::Ok()
                .content_type(content_type_for(path))
                .body(content.data.into_owned())),
            None => {
                debug!("Static file not found: {}", path);
                Ok(HttpResponse::NotFound().body("File not found"))
            }
        }
    }
}

pub fn frontend_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(FrontendService::handle_index))
        .route("/admin", web::get().to(FrontendService::handle_admin_panel))
        .route("/admin/", web::get().to(FrontendService::handle_admin_panel))
        .route("/static/{path:.*}", web::get().to(FrontendService::handle_static));
}
