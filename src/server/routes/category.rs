//! Public category reads

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/categories/tree", web::get().to(visible_tree));
}

/// Visible categories only
async fn visible_tree(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let tree = state.categories.tree(true).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(tree)))
}
