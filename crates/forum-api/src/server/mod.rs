//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use forum_common::{AppConfig, AppError, JwtService, StorageBackend};
use forum_db::{create_pool, run_migrations, MemoryStore};
use forum_service::{RetryPolicy, ServiceContextBuilder};
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{apply_middleware, apply_rate_limit};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();

    // Health probes are merged after the limiter so they are never throttled
    let router = apply_rate_limit(create_router(), &config.rate_limit).merge(health_routes());
    let router = apply_middleware(router, &config.cors, config.app.env.is_production());

    router.with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let builder = match config.storage {
        StorageBackend::Postgres => {
            let database = config
                .database
                .as_ref()
                .ok_or_else(|| AppError::Config("DATABASE_URL is required for postgres storage".to_string()))?;

            info!("Connecting to PostgreSQL...");
            let pool = create_pool(&forum_db::DatabaseConfig::from(database))
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            info!("PostgreSQL connection established");

            if database.run_migrations {
                run_migrations(&pool, &database.migrations_dir)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
            }

            base_builder(&config).postgres(pool)
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on restart");
            base_builder(&config).memory_store(MemoryStore::new())
        }
    };

    let service_context = builder
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Create AppState over an existing in-memory store, ignoring the configured backend
pub fn create_app_state_with_store(
    config: AppConfig,
    store: MemoryStore,
) -> Result<AppState, AppError> {
    let service_context = base_builder(&config)
        .memory_store(store)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

fn base_builder(config: &AppConfig) -> ServiceContextBuilder {
    ServiceContextBuilder::new()
        .jwt_service(Arc::new(JwtService::new(&config.jwt.secret)))
        .retry_policy(RetryPolicy::from(&config.reactions))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {}", e)))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid API address {}: {}", config.api.address(), e)))?;

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, addr).await
}
