//! HTTP route modules
//!
//! - `/health`
//! - `/api/v1/auth/*` and `/api/v1/categories/tree` (public)
//! - `/api/v1/user/*` (JWT)
//! - `/admin/api/v1/*` (JWT + RBAC gate)

pub mod admin;
pub mod auth;
pub mod category;
pub mod health;
pub mod user;

use crate::server::middleware::{JwtAuthMiddleware, RbacMiddleware};
use crate::storage::repository::{Page, Paged};
use actix_web::web;
use serde::{Deserialize, Serialize};

/// Mount every route
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .service(
            web::scope("/api/v1")
                .configure(auth::configure_routes)
                .configure(category::configure_routes)
                .service(
                    web::scope("/user")
                        .wrap(JwtAuthMiddleware)
                        .configure(user::configure_routes),
                ),
        )
        .service(
            web::scope("/admin/api/v1")
                .wrap(RbacMiddleware)
                .wrap(JwtAuthMiddleware)
                .configure(admin::configure_routes),
        );
}

/// Standard API response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload
    pub fn message<S: Into<String>>(message: S) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub list: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub pages: u64,
}

impl<T> PageResult<T> {
    pub fn new(paged: Paged<T>, page: Page) -> Self {
        Self {
            pages: paged.total.div_ceil(page.page_size),
            list: paged.items,
            total: paged.total,
            page: page.page,
            page_size: page.page_size,
        }
    }
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    10
}

/// `page` / `page_size` query parameters
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl PageQuery {
    /// Clamped to `1..=MAX_PAGE_SIZE`
    pub fn page(&self) -> Page {
        Page::new(self.page, self.page_size)
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

/// Body of the `.../{id}/status` endpoints
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StatusRequest {
    pub enabled: bool,
}
