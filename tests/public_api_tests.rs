//! Public endpoint tests
//!
//! Page data, visit recording, click-through and embedded pages.

use std::sync::Once;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::middleware::from_fn;
use actix_web::test::{self, TestRequest};
use actix_web::App;
use chrono::{Duration, Utc};
use serde_json::Value;
use tempfile::TempDir;

use linkpage::analytics::{EventStore, TimeRange};
use linkpage::api::AppState;
use linkpage::api::constants::SESSION_COOKIE_NAME;
use linkpage::api::middleware::reset_admin_session;
use linkpage::config::init_config;
use linkpage::services::{CreateLinkRequest, LinkService, UploadService};
use linkpage::storage::{NewGroup, StorageFactory};

static INIT: Once = Once::new();

fn init_static_config() {
    INIT.call_once(|| {
        init_config();
    });
}

async fn create_state() -> (AppState, TempDir) {
    init_static_config();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_url = format!(
        "sqlite://{}?mode=rwc",
        temp_dir.path().join("public_api_test.db").display()
    );
    let storage = StorageFactory::create_with_url(&db_url)
        .await
        .expect("Failed to create storage");
    let uploads = UploadService::new(
        temp_dir.path().join("uploads"),
        1024 * 1024,
        vec!["image/png".to_string()],
    );
    (AppState::new(storage, uploads), temp_dir)
}

macro_rules! public_app {
    ($state:expr) => {{
        let state = $state.clone();
        test::init_service(
            App::new()
                .wrap(from_fn(reset_admin_session))
                .configure(move |cfg| state.configure(cfg)),
        )
        .await
    }};
}

fn link(title: &str, url: &str) -> CreateLinkRequest {
    CreateLinkRequest {
        title: title.to_string(),
        url: url.to_string(),
        ..Default::default()
    }
}

// =============================================================================
// Page data
// =============================================================================

#[actix_rt::test]
async fn test_public_page_hides_inactive_and_locks_scheduled() {
    let (state, _dir) = create_state().await;
    let links = LinkService::new(state.storage().clone());
    let group = links
        .create_group(NewGroup {
            name: "Projects".to_string(),
            order: None,
        })
        .await
        .unwrap();
    links
        .create_link(CreateLinkRequest {
            group_id: Some(group.id),
            ..link("Live", "https://live.example.com")
        })
        .await
        .unwrap();
    links
        .create_link(CreateLinkRequest {
            start_date: Some((Utc::now() + Duration::days(30)).to_rfc3339()),
            ..link("Later", "https://later.example.com")
        })
        .await
        .unwrap();
    links
        .create_link(CreateLinkRequest {
            is_active: Some(false),
            ..link("Hidden", "https://hidden.example.com")
        })
        .await
        .unwrap();

    let app = public_app!(state);
    let req = TestRequest::get().uri("/api/public").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let page = &body["data"];

    assert_eq!(page["profile"]["name"], "My Page");
    assert_eq!(page["groups"][0]["name"], "Projects");
    assert_eq!(page["groups"][0]["links"][0]["title"], "Live");
    assert_eq!(page["groups"][0]["links"][0]["clickable"], true);

    let ungrouped = page["ungrouped"].as_array().expect("ungrouped links");
    assert_eq!(ungrouped.len(), 1);
    assert_eq!(ungrouped[0]["title"], "Later");
    assert_eq!(ungrouped[0]["locked"], true);
    assert!(ungrouped[0]["href"].is_null());

    let text = body.to_string();
    assert!(!text.contains("Hidden"));
    assert!(!text.contains("https://later.example.com"));
}

#[actix_rt::test]
async fn test_public_page_rejects_unknown_sort() {
    let (state, _dir) = create_state().await;
    let app = public_app!(state);
    let req = TestRequest::get()
        .uri("/api/public?sort=popularity")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1000);
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
}

// =============================================================================
// Tracking
// =============================================================================

#[actix_rt::test]
async fn test_visit_is_recorded() {
    let (state, _dir) = create_state().await;
    let app = public_app!(state);

    let req = TestRequest::post().uri("/api/visit").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let now = Utc::now();
    let range = TimeRange::new(now - Duration::minutes(5), now + Duration::minutes(5)).unwrap();
    let visits = state.storage().visit_timestamps(&range).await.unwrap();
    assert_eq!(visits.len(), 1);
}

#[actix_rt::test]
async fn test_click_through_redirects_and_records() {
    let (state, _dir) = create_state().await;
    let created = LinkService::new(state.storage().clone())
        .create_link(link("Shop", "https://shop.example.com"))
        .await
        .unwrap();
    let app = public_app!(state);

    let req = TestRequest::get()
        .uri(&format!("/go/{}", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get("Location").and_then(|v| v.to_str().ok()),
        Some("https://shop.example.com")
    );

    let now = Utc::now();
    let range = TimeRange::new(now - Duration::minutes(5), now + Duration::minutes(5)).unwrap();
    let clicks = state
        .storage()
        .click_events(&range, Some(created.id))
        .await
        .unwrap();
    assert_eq!(clicks.len(), 1);
}

#[actix_rt::test]
async fn test_click_through_locked_link() {
    let (state, _dir) = create_state().await;
    let created = LinkService::new(state.storage().clone())
        .create_link(CreateLinkRequest {
            start_date: Some("2999-01-01".to_string()),
            ..link("Launch", "https://launch.example.com")
        })
        .await
        .unwrap();
    let app = public_app!(state);

    let req = TestRequest::get()
        .uri(&format!("/go/{}", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::LOCKED);
    assert!(resp.headers().get("Location").is_none());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3007);
    assert_eq!(body["data"]["link_id"], created.id);

    let range = TimeRange::new(Utc::now() - Duration::days(1), Utc::now()).unwrap();
    let clicks = state
        .storage()
        .click_events(&range, Some(created.id))
        .await
        .unwrap();
    assert!(clicks.is_empty());
}

#[actix_rt::test]
async fn test_click_through_missing_or_inactive() {
    let (state, _dir) = create_state().await;
    let inactive = LinkService::new(state.storage().clone())
        .create_link(CreateLinkRequest {
            is_active: Some(false),
            ..link("Off", "https://off.example.com")
        })
        .await
        .unwrap();
    let app = public_app!(state);

    for id in [inactive.id, 9999] {
        let req = TestRequest::get().uri(&format!("/go/{}", id)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

// =============================================================================
// Session reset and pages
// =============================================================================

#[actix_rt::test]
async fn test_public_request_clears_admin_session() {
    let (state, _dir) = create_state().await;
    let app = public_app!(state);

    let req = TestRequest::get()
        .uri("/api/public")
        .cookie(Cookie::new(SESSION_COOKIE_NAME, "anything"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cleared = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE_NAME)
        .expect("session cookie is expired");
    assert_eq!(cleared.value(), "");

    let req = TestRequest::get()
        .uri("/admin")
        .cookie(Cookie::new(SESSION_COOKIE_NAME, "anything"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(
        resp.response()
            .cookies()
            .all(|c| c.name() != SESSION_COOKIE_NAME)
    );
}

#[actix_rt::test]
async fn test_embedded_pages_and_health() {
    let (state, _dir) = create_state().await;
    let app = public_app!(state);

    let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, TestRequest::get().uri("/admin").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("/admin/api/v1"));
    assert!(!html.contains("%ADMIN_API_PREFIX%"));

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/static/admin.html").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, TestRequest::get().uri("/health/live").to_request()).await;
    assert!(resp.status().is_success());

    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_uploaded_file_is_served() {
    let (state, dir) = create_state().await;
    let uploads_dir = dir.path().join("uploads");
    std::fs::create_dir_all(&uploads_dir).unwrap();
    std::fs::write(uploads_dir.join("123-abc-avatar.png"), b"\x89PNG").unwrap();
    let app = public_app!(state);

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/uploads/123-abc-avatar.png")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("Content-Type")
            .and_then(|v| v.to_str().ok()),
        Some("image/png")
    );

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/uploads/missing.png").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
