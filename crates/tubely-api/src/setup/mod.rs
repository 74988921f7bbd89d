//! Application bootstrap: wire configuration into concrete collaborators.

pub mod routes;
pub mod server;

use crate::auth::JwtAuthenticator;
use crate::services::upload::UploadOrchestrator;
use crate::state::AppState;
use anyhow::Context;
use axum::Router;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::FfmpegToolkit;
use tubely_storage::create_storage;

/// Connect the database, storage backend and media tools, and build the router.
pub async fn initialize_app(config: &Config) -> anyhow::Result<Router> {
    let pool = tubely_db::connect(&config.database_url).await?;
    let videos = Arc::new(VideoRepository::new(pool));

    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;
    tracing::info!(backend = %storage.backend_type(), "Storage backend ready");

    let toolkit = Arc::new(
        FfmpegToolkit::from_config(config).context("Invalid media tool configuration")?,
    );

    tokio::fs::create_dir_all(&config.upload_temp_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create upload temp dir {}",
                config.upload_temp_dir.display()
            )
        })?;

    let uploads = UploadOrchestrator::new(videos, storage, toolkit, config.upload_limits());
    let state = Arc::new(AppState::new(
        JwtAuthenticator::new(&config.jwt_secret),
        uploads,
        config.is_production(),
    ));

    Ok(routes::setup_routes(state))
}
