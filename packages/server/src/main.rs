use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use common::storage::FilesystemDocumentStore;
use dashmap::DashMap;
use tracing::{Level, info};

use server::config::AppConfig;
use server::policy::AccessPolicy;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Contradictory access rules are fatal here, never per-request.
    let access =
        AccessPolicy::from_config(&config.access).context("Invalid network access rules")?;

    let db = server::database::init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;
    let docs = FilesystemDocumentStore::new(
        config.storage.docs_dir.clone(),
        config.storage.max_document_size,
    )
    .await
    .context("Failed to initialize document storage")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db,
        docs: Arc::new(docs),
        config: Arc::new(config),
        access: Arc::new(access),
        revoked_tokens: Arc::new(DashMap::new()),
    };

    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Archive listening on http://{addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
