//! Endpoints for the authenticated caller

use crate::server::middleware::AuthContext;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::services::user::{ChangePasswordRequest, ProfileUpdateRequest};
use actix_web::{HttpResponse, Result as ActixResult, web};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/profile", web::get().to(profile))
        .route("/profile", web::put().to(update_profile))
        .route("/password", web::put().to(change_password))
        .route("/menus", web::get().to(menus));
}

async fn profile(state: web::Data<AppState>, caller: AuthContext) -> ActixResult<HttpResponse> {
    let profile = state.users.profile(caller.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(profile)))
}

async fn update_profile(
    state: web::Data<AppState>,
    caller: AuthContext,
    body: web::Json<ProfileUpdateRequest>,
) -> ActixResult<HttpResponse> {
    let profile = state
        .users
        .update_profile(caller.user_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(profile)))
}

async fn change_password(
    state: web::Data<AppState>,
    caller: AuthContext,
    body: web::Json<ChangePasswordRequest>,
) -> ActixResult<HttpResponse> {
    state
        .users
        .change_password(caller.user_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Password changed")))
}

/// Navigation tree for the roles carried by the caller's token
async fn menus(state: web::Data<AppState>, caller: AuthContext) -> ActixResult<HttpResponse> {
    let tree = state
        .permissions
        .menu_tree_for_roles(&caller.role_ids)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(tree)))
}
