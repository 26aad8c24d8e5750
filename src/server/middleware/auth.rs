//! JWT authentication middleware

use super::helpers::bearer_token;
use crate::auth::jwt::Claims;
use crate::server::state::AppState;
use crate::utils::error::BlogError;
use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::{FromRequest, HttpMessage, HttpRequest, web};
use futures::future::{Ready, ready};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, warn};

/// Identity of an authenticated caller, attached to the request extensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: i32,
    pub username: String,
    pub role_ids: Vec<i32>,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            role_ids: claims.role_ids,
        }
    }
}

impl FromRequest for AuthContext {
    type Error = BlogError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthContext>()
                .cloned()
                .ok_or_else(|| BlogError::unauthorized("Authentication required")),
        )
    }
}

/// Rejects requests without a valid access token
pub struct JwtAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService { service }))
    }
}

/// Service implementation for the JWT middleware
pub struct JwtAuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let verified = match req.app_data::<web::Data<AppState>>() {
            Some(state) => match bearer_token(req.headers()) {
                Some(token) => state.auth.jwt.verify_access_token(token),
                None => Err(BlogError::unauthorized("Missing bearer token")),
            },
            None => Err(BlogError::internal("Application state is not configured")),
        };

        match verified {
            Ok(claims) => {
                debug!(user_id = claims.sub, roles = ?claims.role_ids, "Request authenticated");
                req.extensions_mut().insert(AuthContext::from(claims));
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            Err(e) => {
                warn!(path = %req.path(), error = %e, "Authentication failed");
                let res = req.error_response(e);
                Box::pin(async move { Ok(res.map_into_right_body()) })
            }
        }
    }
}
