//! RBAC gate
//!
//! Runs after [`super::JwtAuthMiddleware`] and checks the caller's roles against
//! the api permissions for the request method and path.

use super::auth::AuthContext;
use crate::server::state::AppState;
use crate::utils::error::BlogError;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::{HttpMessage, web};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use tracing::{debug, error, warn};

pub struct RbacMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RbacMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RbacMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RbacMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct RbacMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RbacMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let context = req.extensions().get::<AuthContext>().cloned();
            let Some(context) = context else {
                let err = BlogError::unauthorized("Authentication required");
                return Ok(req.error_response(err).map_into_right_body());
            };
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                let err = BlogError::internal("Application state is not configured");
                return Ok(req.error_response(err).map_into_right_body());
            };

            let path = req.path().to_string();
            let method = req.method().as_str().to_string();

            match state
                .auth
                .rbac
                .check_access(context.user_id, &context.role_ids, &path, &method)
                .await
            {
                Ok(decision) if decision.is_allowed() => {
                    debug!(user_id = context.user_id, %method, %path, ?decision, "Access granted");
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Ok(_) => {
                    warn!(
                        user_id = context.user_id,
                        role_ids = ?context.role_ids,
                        %method,
                        %path,
                        "Access denied"
                    );
                    let err = BlogError::forbidden(format!("No permission for {} {}", method, path));
                    Ok(req.error_response(err).map_into_right_body())
                }
                Err(e) => {
                    error!(
                        user_id = context.user_id,
                        role_ids = ?context.role_ids,
                        %method,
                        %path,
                        error = %e,
                        "Access check failed"
                    );
                    Ok(req.error_response(e).map_into_right_body())
                }
            }
        })
    }
}
