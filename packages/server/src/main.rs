use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use common::file_store::http::HttpFileStore;
use tracing::{Level, info};

use recipe_server::config::AppConfig;
use recipe_server::database::init_db;
use recipe_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = init_db(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Database connected and schema synced");

    let file_store = HttpFileStore::from_config(&config.upload)
        .context("Failed to build upload server client")?;
    info!(server_url = %config.upload.server_url, "Upload server client ready");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState {
        db,
        config: Arc::new(config),
        file_store: Arc::new(file_store),
    };
    let app = recipe_server::build_router(state);

    info!("Server running at http://{}", addr);
    info!("API docs at http://{}/scalar", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
