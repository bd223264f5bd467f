use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{info, trace};

use crate::api::constants;
use crate::api::jwt::get_jwt_service;
use crate::api::services::admin::{ApiResponse, ErrorCode};

/// Admin authentication middleware
///
/// Every admin API request must carry a valid session cookie, except the
/// login and logout endpoints.
#[derive(Clone)]
pub struct AdminAuth;

impl<S, B> Transform<S, ServiceRequest> for AdminAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddleware {
            service: Rc::new(service),
            open_paths: [
                format!("{}/v1/auth/login", constants::ADMIN_API_PREFIX),
                format!("{}/v1/auth/logout", constants::ADMIN_API_PREFIX),
            ],
        }))
    }
}

pub struct AdminAuthMiddleware<S> {
    service: Rc<S>,
    open_paths: [String; 2],
}

impl<S, B> AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// Handle unauthorized requests
    fn handle_unauthorized(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        info!("Admin authentication failed - invalid or missing session");
        req.into_response(
            HttpResponse::Unauthorized()
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(ApiResponse::<()> {
                    code: ErrorCode::Unauthorized as i32,
                    message: "Unauthorized: invalid or missing session".to_string(),
                    data: None,
                })
                .map_into_right_body(),
        )
    }

    /// Validate the session JWT from the cookie
    fn validate_session_cookie(req: &ServiceRequest) -> bool {
        let Some(cookie) = req.cookie(constants::SESSION_COOKIE_NAME) else {
            return false;
        };

        match get_jwt_service().validate_session_token(cookie.value()) {
            Ok(_claims) => {
                trace!("Session validation successful");
                true
            }
            Err(e) => {
                info!("Session validation failed: {}", e);
                false
            }
        }
    }
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let is_open = self.open_paths.iter().any(|p| p == req.path());

        Box::pin(async move {
            if is_open {
                trace!("{} accessed - bypassing authentication", req.path());
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            if Self::validate_session_cookie(&req) {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            Ok(Self::handle_unauthorized(req))
        })
    }
}
