//! Administration endpoints under `/admin/api/v1`
//!
//! Every route here sits behind the JWT middleware and the RBAC gate; the
//! access descriptors of api permissions name these paths.

mod categories;
mod permissions;
mod roles;
mod users;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(users::configure_routes)
        .configure(roles::configure_routes)
        .configure(permissions::configure_routes)
        .configure(categories::configure_routes);
}
