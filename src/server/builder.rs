//! Server startup

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::Result;
use tracing::info;

/// Build the server from a loaded configuration and run it until shutdown
pub async fn run_server(config: Config) -> Result<()> {
    info!("Starting blog server v{}", env!("CARGO_PKG_VERSION"));

    let server = HttpServer::new(&config).await?;
    info!("Server starting at: http://{}", config.server.address());
    info!("API Endpoints:");
    info!("   GET  /health - Health check");
    info!("   POST /api/v1/auth/login - Log in");
    info!("   GET  /api/v1/user/menus - Navigation menus of the caller");
    info!("   *    /admin/api/v1/... - Administration (JWT + RBAC)");

    server.start().await
}
