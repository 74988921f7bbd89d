//! Record store for video metadata
//!
//! The upload pipeline talks to [`VideoStore`]; [`VideoRepository`] is the
//! PostgreSQL implementation used by the server.

pub mod video;

pub use video::{VideoRepository, VideoStore};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

const MAX_CONNECTIONS: u32 = 10;

/// Connect to PostgreSQL and bring the schema up to date.
pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    run_migrations(&pool).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");
    Ok(())
}
