use std::sync::Arc;

use category_admin::core::app::{bind_listener, build_router};
use category_admin::core::config::Config;
use category_admin::core::{database, openapi};
use category_admin::features::categories::store::seed;
use category_admin::features::categories::{
    CategoryService, CategoryStore, InMemoryCategoryStore, PgCategoryStore,
};
use category_admin::shared::constants::OPENAPI_JSON_PATH;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!(
        "Configuration loaded: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );

    let store = open_store(&config).await?;
    let category_service = Arc::new(CategoryService::new(store));

    let app = build_router(
        category_service,
        &config.app,
        openapi::document(&config.openapi),
    );

    let addr = config.app.server_address();
    let listener = bind_listener(&addr)?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("OpenAPI document at http://{}{}", addr, OPENAPI_JSON_PATH);

    axum::serve(listener, app).await?;

    Ok(())
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise an in-memory store
async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn CategoryStore>> {
    let Some(db_config) = &config.database else {
        tracing::warn!("DATABASE_URL not set, categories are kept in memory only");
        let store = if config.store.seed_catalog {
            tracing::info!("Seeding in-memory store with the vehicles catalog");
            InMemoryCategoryStore::with_categories(seed::catalog())
        } else {
            InMemoryCategoryStore::new()
        };
        return Ok(Arc::new(store));
    };

    let pool = database::create_pool(db_config).await?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    let store = PgCategoryStore::new(pool);
    if config.store.seed_catalog {
        store.seed(&seed::catalog()).await?;
    }

    Ok(Arc::new(store))
}
