//! User administration

use crate::server::middleware::AuthContext;
use crate::server::routes::{ApiResponse, PageQuery, PageResult, StatusRequest};
use crate::server::state::AppState;
use crate::services::user::{CreateUserRequest, ResetPasswordRequest};
use crate::storage::repository::{UserFilter, UserPatch};
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Deserialize;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(list))
            .route("", web::post().to(create))
            .route("/{id}", web::get().to(get))
            .route("/{id}", web::put().to(update))
            .route("/{id}", web::delete().to(delete))
            .route("/{id}/status", web::put().to(set_status))
            .route("/{id}/password", web::put().to(reset_password))
            .route("/{id}/roles", web::put().to(assign_roles)),
    );
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ListQuery {
    page: Option<u64>,
    page_size: Option<u64>,
    username: Option<String>,
    is_enabled: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
struct AssignRolesRequest {
    role_ids: Vec<i32>,
}

async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> ActixResult<HttpResponse> {
    let query = query.into_inner();
    let defaults = PageQuery::default();
    let page = PageQuery {
        page: query.page.unwrap_or(defaults.page),
        page_size: query.page_size.unwrap_or(defaults.page_size),
    }
    .page();
    let filter = UserFilter {
        username: query.username.filter(|s| !s.is_empty()),
        is_enabled: query.is_enabled,
    };

    let paged = state.users.list(filter, page).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(PageResult::new(paged, page))))
}

async fn get(state: web::Data<AppState>, id: web::Path<i32>) -> ActixResult<HttpResponse> {
    let profile = state.users.get(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(profile)))
}

async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreateUserRequest>,
) -> ActixResult<HttpResponse> {
    let profile = state.users.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(profile)))
}

async fn update(
    state: web::Data<AppState>,
    id: web::Path<i32>,
    body: web::Json<UserPatch>,
) -> ActixResult<HttpResponse> {
    let user = state.users.update(id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(user)))
}

async fn set_status(
    state: web::Data<AppState>,
    caller: AuthContext,
    id: web::Path<i32>,
    body: web::Json<StatusRequest>,
) -> ActixResult<HttpResponse> {
    state
        .users
        .set_enabled(caller.user_id, id.into_inner(), body.enabled)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Status updated")))
}

async fn reset_password(
    state: web::Data<AppState>,
    caller: AuthContext,
    id: web::Path<i32>,
    body: web::Json<ResetPasswordRequest>,
) -> ActixResult<HttpResponse> {
    state
        .users
        .reset_password(caller.user_id, id.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Password reset")))
}

async fn delete(
    state: web::Data<AppState>,
    caller: AuthContext,
    id: web::Path<i32>,
) -> ActixResult<HttpResponse> {
    state.users.delete(caller.user_id, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("User deleted")))
}

async fn assign_roles(
    state: web::Data<AppState>,
    id: web::Path<i32>,
    body: web::Json<AssignRolesRequest>,
) -> ActixResult<HttpResponse> {
    let ids = state
        .users
        .assign_roles(id.into_inner(), &body.role_ids)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(ids)))
}
