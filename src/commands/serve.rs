//! Serve command
//!
//! Runs the shopping-list HTTP API until the process is stopped.

use anyhow::Context;

use shopping_list::config::ServerConfig;
use shopping_list::server::ItemServer;

/// Start the HTTP server
pub fn serve(config: &ServerConfig) -> anyhow::Result<()> {
    let server = ItemServer::bind(config)
        .with_context(|| format!("Failed to start server on {}", config.bind_addr()))?;

    let port = server.local_addr().map_or(config.port, |addr| addr.port());
    log::info!("Listening on localhost: {port}");
    log::info!("Items stored at {}", config.database_url);
    if let Some(dir) = &config.static_dir {
        log::info!("Serving static files from {}", dir.display());
    }

    server.run().context("Server stopped with an error")
}
