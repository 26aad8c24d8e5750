//! Role administration

use crate::server::routes::{ApiResponse, PageQuery, PageResult, StatusRequest};
use crate::server::state::AppState;
use crate::storage::repository::{NewRole, RoleFilter, RolePatch};
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Deserialize;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/roles")
            .route("", web::get().to(list))
            .route("", web::post().to(create))
            .route("/options", web::get().to(options))
            .route("/{id}", web::get().to(get))
            .route("/{id}", web::put().to(update))
            .route("/{id}", web::delete().to(delete))
            .route("/{id}/status", web::put().to(set_status))
            .route("/{id}/permissions", web::get().to(permission_ids))
            .route("/{id}/permissions", web::put().to(assign_permissions)),
    );
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ListQuery {
    page: Option<u64>,
    page_size: Option<u64>,
    role_name: Option<String>,
    role_key: Option<String>,
    is_enabled: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
struct AssignPermissionsRequest {
    perm_ids: Vec<i32>,
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
    let filter = RoleFilter {
        role_name: query.role_name.filter(|s| !s.is_empty()),
        role_key: query.role_key.filter(|s| !s.is_empty()),
        is_enabled: query.is_enabled,
    };

    let paged = state.roles.list(filter, page).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(PageResult::new(paged, page))))
}

async fn options(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let options = state.roles.options().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(options)))
}

async fn get(state: web::Data<AppState>, id: web::Path<i32>) -> ActixResult<HttpResponse> {
    let detail = state.roles.get(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(detail)))
}

async fn create(state: web::Data<AppState>, body: web::Json<NewRole>) -> ActixResult<HttpResponse> {
    let role = state.roles.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(role)))
}

async fn update(
    state: web::Data<AppState>,
    id: web::Path<i32>,
    body: web::Json<RolePatch>,
) -> ActixResult<HttpResponse> {
    let role = state.roles.update(id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(role)))
}

async fn set_status(
    state: web::Data<AppState>,
    id: web::Path<i32>,
    body: web::Json<StatusRequest>,
) -> ActixResult<HttpResponse> {
    state.roles.set_enabled(id.into_inner(), body.enabled).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Status updated")))
}

async fn delete(state: web::Data<AppState>, id: web::Path<i32>) -> ActixResult<HttpResponse> {
    state.roles.delete(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Role deleted")))
}

async fn permission_ids(
    state: web::Data<AppState>,
    id: web::Path<i32>,
) -> ActixResult<HttpResponse> {
    let ids = state.roles.permission_ids(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(ids)))
}

async fn assign_permissions(
    state: web::Data<AppState>,
    id: web::Path<i32>,
    body: web::Json<AssignPermissionsRequest>,
) -> ActixResult<HttpResponse> {
    let ids = state
        .roles
        .assign_permissions(id.into_inner(), &body.perm_ids)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(ids)))
}
