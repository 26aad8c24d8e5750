//! Health check endpoint

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{debug, warn};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

#[derive(Debug, Clone, Serialize)]
struct HealthStatus {
    status: &'static str,
    database: &'static str,
    version: &'static str,
    timestamp: chrono::DateTime<chrono::Utc>,
}

/// Basic health check
///
/// 200 while the database answers a ping, 503 otherwise.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    debug!("Health check requested");

    let database_ok = match state.storage.health_check().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            false
        }
    };

    let status = HealthStatus {
        status: if database_ok { "healthy" } else { "degraded" },
        database: if database_ok { "up" } else { "down" },
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now(),
    };

    if database_ok {
        HttpResponse::Ok().json(ApiResponse::success(status))
    } else {
        HttpResponse::ServiceUnavailable().json(ApiResponse::success(status))
    }
}
