//! Category administration

use crate::server::routes::{ApiResponse, PageQuery, PageResult, StatusRequest};
use crate::server::state::AppState;
use crate::storage::repository::{CategoryFilter, CategoryPatch, NewCategory};
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Deserialize;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/categories")
            .route("", web::get().to(list))
            .route("", web::post().to(create))
            .route("/tree", web::get().to(tree))
            .route("/options", web::get().to(options))
            .route("/{id}", web::get().to(get))
            .route("/{id}", web::put().to(update))
            .route("/{id}", web::delete().to(delete))
            .route("/{id}/status", web::put().to(set_status))
            .route("/{id}/descendants", web::get().to(descendants)),
    );
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ListQuery {
    page: Option<u64>,
    page_size: Option<u64>,
    category_name: Option<String>,
    parent_id: Option<i32>,
    is_visible: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct TreeQuery {
    #[serde(default)]
    visible_only: bool,
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
    let filter = CategoryFilter {
        category_name: query.category_name.filter(|s| !s.is_empty()),
        parent_id: query.parent_id,
        is_visible: query.is_visible,
    };

    let paged = state.categories.list(filter, page).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(PageResult::new(paged, page))))
}

async fn tree(
    state: web::Data<AppState>,
    query: web::Query<TreeQuery>,
) -> ActixResult<HttpResponse> {
    let tree = state.categories.tree(query.visible_only).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(tree)))
}

async fn options(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let options = state.categories.options().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(options)))
}

async fn get(state: web::Data<AppState>, id: web::Path<i32>) -> ActixResult<HttpResponse> {
    let category = state.categories.get(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(category)))
}

async fn create(
    state: web::Data<AppState>,
    body: web::Json<NewCategory>,
) -> ActixResult<HttpResponse> {
    let category = state.categories.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(category)))
}

async fn update(
    state: web::Data<AppState>,
    id: web::Path<i32>,
    body: web::Json<CategoryPatch>,
) -> ActixResult<HttpResponse> {
    let category = state
        .categories
        .update(id.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(category)))
}

/// Visibility toggle
async fn set_status(
    state: web::Data<AppState>,
    id: web::Path<i32>,
    body: web::Json<StatusRequest>,
) -> ActixResult<HttpResponse> {
    let patch = CategoryPatch {
        is_visible: Some(body.enabled),
        ..Default::default()
    };
    state.categories.update(id.into_inner(), patch).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Status updated")))
}

async fn delete(state: web::Data<AppState>, id: web::Path<i32>) -> ActixResult<HttpResponse> {
    state.categories.delete(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Category deleted")))
}

async fn descendants(
    state: web::Data<AppState>,
    id: web::Path<i32>,
) -> ActixResult<HttpResponse> {
    let found = state.categories.descendants(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(found)))
}
