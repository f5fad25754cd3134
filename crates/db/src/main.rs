use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_db::repositories::CatalogRepo;
use catalog_db::DbConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_db=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = DbConfig::from_env()?;
    tracing::info!(max_connections = config.max_connections, "Loaded database configuration");

    // --- Database ---
    let pool = catalog_db::create_pool(&config)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    catalog_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database health check passed");

    if config.run_migrations {
        catalog_db::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;
        tracing::info!("Database migrations applied");
    }

    let counts = CatalogRepo::counts(&pool).await?;
    tracing::info!(
        books = counts.num_books,
        copies = counts.num_instances,
        available = counts.num_instances_available,
        authors = counts.num_authors,
        genres = counts.num_genres,
        "Catalog ready"
    );

    pool.close().await;
    Ok(())
}
