//! HTTP surface
//!
//! `AppState` owns the services shared by all workers; `configure` mounts
//! the admin API, health probes, public endpoints and embedded pages.

pub mod constants;
pub mod jwt;
pub mod middleware;
pub mod services;

use std::sync::Arc;

use actix_web::web;

use crate::analytics::{EventStore, LinkTitleLookup};
use crate::services::{
    AnalyticsService, LinkService, ProfileService, PublicPageService, TrackingService,
    UploadService,
};
use crate::storage::SeaOrmStorage;
use middleware::AdminAuth;
use services::admin::{admin_v1_routes, query_error_handler};
use services::{AppStartTime, frontend_routes, health_routes, public_routes};

/// Shared application data, cloned into every worker
#[derive(Clone)]
pub struct AppState {
    storage: web::Data<Arc<SeaOrmStorage>>,
    links: web::Data<LinkService>,
    profile: web::Data<ProfileService>,
    analytics: web::Data<AnalyticsService>,
    tracking: web::Data<TrackingService>,
    public_page: web::Data<PublicPageService>,
    uploads: web::Data<UploadService>,
    start_time: web::Data<AppStartTime>,
}

impl AppState {
    pub fn new(storage: Arc<SeaOrmStorage>, uploads: UploadService) -> Self {
        let events: Arc<dyn EventStore> = storage.clone();
        let titles: Arc<dyn LinkTitleLookup> = storage.clone();

        Self {
            links: web::Data::new(LinkService::new(storage.clone())),
            profile: web::Data::new(ProfileService::new(storage.clone())),
            analytics: web::Data::new(AnalyticsService::new(events.clone(), titles)),
            tracking: web::Data::new(TrackingService::new(storage.clone(), events)),
            public_page: web::Data::new(PublicPageService::new(storage.clone())),
            uploads: web::Data::new(uploads),
            start_time: web::Data::new(AppStartTime::now()),
            storage: web::Data::new(storage),
        }
    }

    pub fn storage(&self) -> &Arc<SeaOrmStorage> {
        &self.storage
    }

    /// Register app data and every route
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.storage.clone())
            .app_data(self.links.clone())
            .app_data(self.profile.clone())
            .app_data(self.analytics.clone())
            .app_data(self.tracking.clone())
            .app_data(self.public_page.clone())
            .app_data(self.uploads.clone())
            .app_data(self.start_time.clone())
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .service(
                web::scope(constants::ADMIN_API_PREFIX)
                    .wrap(AdminAuth)
                    .service(admin_v1_routes()),
            )
            .service(health_routes())
            .configure(public_routes)
            .configure(frontend_routes);
    }
}
