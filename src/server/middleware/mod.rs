//! HTTP middleware implementations
//!
//! - Request ID tracking
//! - JWT authentication
//! - RBAC gate over access descriptors

mod auth;
mod helpers;
mod rbac;
mod request_id;


pub use auth::{AuthContext, JwtAuthMiddleware, JwtAuthMiddlewareService};
pub use helpers::{bearer_token, request_id};
pub use rbac::{RbacMiddleware, RbacMiddlewareService};
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdMiddleware, RequestIdMiddlewareService};
