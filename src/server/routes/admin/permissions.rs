//! Permission administration

use crate::core::models::PermissionType;
use crate::server::routes::{ApiResponse, PageQuery, PageResult, StatusRequest};
use crate::server::state::AppState;
use crate::storage::repository::{NewPermission, PermissionFilter, PermissionPatch};
use crate::utils::error::Result;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Deserialize;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/permissions")
            .route("", web::get().to(list))
            .route("", web::post().to(create))
            .route("/tree", web::get().to(tree))
            .route("/options", web::get().to(options))
            .route("/{id}", web::get().to(get))
            .route("/{id}", web::put().to(update))
            .route("/{id}", web::delete().to(delete))
            .route("/{id}/status", web::put().to(set_status)),
    );
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ListQuery {
    page: Option<u64>,
    page_size: Option<u64>,
    perm_name: Option<String>,
    perm_key: Option<String>,
    perm_type: Option<i32>,
    parent_id: Option<i32>,
    is_enabled: Option<bool>,
}

impl ListQuery {
    fn into_parts(self) -> Result<(PermissionFilter, PageQuery)> {
        let defaults = PageQuery::default();
        let page = PageQuery {
            page: self.page.unwrap_or(defaults.page),
            page_size: self.page_size.unwrap_or(defaults.page_size),
        };
        let filter = PermissionFilter {
            perm_name: self.perm_name.filter(|s| !s.is_empty()),
            perm_key: self.perm_key.filter(|s| !s.is_empty()),
            perm_type: self.perm_type.map(PermissionType::try_from).transpose()?,
            parent_id: self.parent_id,
            is_enabled: self.is_enabled,
        };
        Ok((filter, page))
    }
}

async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> ActixResult<HttpResponse> {
    let (filter, page) = query.into_inner().into_parts()?;
    let page = page.page();
    let paged = state.permissions.list(filter, page).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(PageResult::new(paged, page))))
}

async fn tree(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let tree = state.permissions.tree().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(tree)))
}

async fn options(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let options = state.permissions.options().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(options)))
}

async fn get(state: web::Data<AppState>, id: web::Path<i32>) -> ActixResult<HttpResponse> {
    let permission = state.permissions.get(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(permission)))
}

async fn create(
    state: web::Data<AppState>,
    body: web::Json<NewPermission>,
) -> ActixResult<HttpResponse> {
    let permission = state.permissions.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(permission)))
}

async fn update(
    state: web::Data<AppState>,
    id: web::Path<i32>,
    body: web::Json<PermissionPatch>,
) -> ActixResult<HttpResponse> {
    let permission = state
        .permissions
        .update(id.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(permission)))
}

async fn set_status(
    state: web::Data<AppState>,
    id: web::Path<i32>,
    body: web::Json<StatusRequest>,
) -> ActixResult<HttpResponse> {
    state
        .permissions
        .set_enabled(id.into_inner(), body.enabled)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Status updated")))
}

async fn delete(state: web::Data<AppState>, id: web::Path<i32>) -> ActixResult<HttpResponse> {
    state.permissions.delete(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Permission deleted")))
}
