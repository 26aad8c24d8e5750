//! HTTP server implementation
//!
//! This module provides the HTTP server, its middleware and the route tree.

pub mod builder;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use builder::run_server;
pub use server::HttpServer;
pub use state::AppState;
