//! Registration, login and token refresh

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::services::user::{LoginRequest, RefreshRequest, RegisterRequest};
use actix_web::{HttpResponse, Result as ActixResult, web};
use tracing::info;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/refresh", web::post().to(refresh)),
    );
}

async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> ActixResult<HttpResponse> {
    info!(username = %request.username, "Registration attempt");
    let user = state.users.register(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(user)))
}

async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    info!(username = %request.username, "Login attempt");
    let response = state.users.login(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

async fn refresh(
    state: web::Data<AppState>,
    request: web::Json<RefreshRequest>,
) -> ActixResult<HttpResponse> {
    let tokens = state.users.refresh(&request.refresh_token).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(tokens)))
}
