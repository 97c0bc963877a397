use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::{error, info};

use table_booking_api::{
    config::Config, db::Database, handlers::AppState, middleware::init_tracing,
    routes::create_router,
};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialize tracing: {}", e);
        std::process::exit(1);
    }

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let database = match Database::new(&config.database) {
        Ok(db) => {
            info!(
                "Database pool created (max {} connections)",
                config.database.max_connections
            );
            db
        }
        Err(e) => {
            error!("Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    // Best-effort version check; the listener does not wait for it
    database.spawn_version_check();

    let store: AppState = Arc::new(database.clone());
    let app = create_router(store, &config.landing_page);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            info!("App is listening on {}", addr);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        database.close();
        std::process::exit(1);
    }

    database.close();
    info!("Server shutdown complete");
}

/// Graceful shutdown signal handler
/// Listens for SIGTERM and SIGINT signals
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, initiating graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, initiating graceful shutdown");
        },
    }
}
