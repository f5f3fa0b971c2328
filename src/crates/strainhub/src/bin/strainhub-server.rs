//! Strainhub server binary
//!
//! Standalone server for the workflow lifecycle service, providing a REST
//! API for login, computation launch, status tracking, and result retrieval.

use std::net::SocketAddr;
use std::sync::Arc;

use strainhub::api::routes::{create_router, AppState};
use strainhub::auth::{CredentialBinder, HttpIdentityVerifier};
use strainhub::config::ServerConfig;
use strainhub::db::DatabaseConnection;
use strainhub::engine::CromwellClient;
use strainhub::storage::HttpObjectStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing/logging
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(rust_log).init();

    // Load configuration from strainhub-server.toml
    tracing::info!("Loading server configuration...");
    let config = match ServerConfig::load() {
        Ok(cfg) => {
            tracing::info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            return Err(format!(
                "Configuration required: {}. Set CONFIG_PATH or place config/strainhub-server.toml",
                e
            )
            .into());
        }
    };

    tracing::info!("Server name: {}", config.server.name);
    tracing::info!("Database path: {}", config.database.path);
    tracing::info!("Engine URL: {}", config.engine.base_url);
    tracing::info!("Algorithm data directory: {}", config.data.algorithm_dir);

    // Server address can be overridden from the environment
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()?;
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    // Initialize database connection
    let database_url = config.database_url();
    tracing::info!("Connecting to database: {}", database_url);
    let db = DatabaseConnection::new(&database_url).await?;

    // Run migrations
    tracing::info!("Running database migrations");
    db.run_migrations().await?;

    // Health check the database
    tracing::info!("Performing database health check");
    db.health_check().await?;

    // Wire up the outbound clients
    let verifier = HttpIdentityVerifier::new(
        config.identity.tokeninfo_url.clone(),
        config.identity.client_id.clone(),
    );
    let binder = CredentialBinder::new(Arc::new(verifier));
    let engine = Arc::new(CromwellClient::new(config.engine.base_url.clone()));
    let storage = Arc::new(HttpObjectStore::new(config.storage.base_url.clone()));

    let state = AppState::new(
        db,
        binder,
        engine,
        storage,
        config.data.algorithm_dir.clone(),
        config.engine.project_id.clone(),
    );

    // Build the router
    tracing::info!("Building API router");
    let app = create_router(state);

    // Create server
    tracing::info!("Starting strainhub server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Run server with graceful shutdown
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Strainhub server shut down gracefully");
    Ok(())
}

/// Signal for graceful shutdown (Ctrl-C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL-C signal handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL-C signal, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down");
        }
    }
}
