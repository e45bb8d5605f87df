use anyhow::Context;
use std::net::SocketAddr;
use tracing::{error, info};

use diagram_api::config::ApiConfig;
use diagram_api::middleware::init_tracing;
use diagram_api::routes;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controls log level (default: info)
    init_tracing();
    info!("Application starting...");

    let config = ApiConfig::from_env().context("Invalid configuration")?;
    if config.is_development() {
        info!("Running in development mode");
    }

    let app_state = routes::create_app_state_with_storage(&config)
        .await
        .context("Failed to initialize storage")?;
    info!(
        "Diagram storage: {}",
        if app_state.is_postgres() { "postgres" } else { "in-memory" }
    );

    let app = routes::build_app(app_state, &config.cors_allowed_origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind listener on {}", addr))?;
    info!("Server listening on {} (port {})", addr, config.port);
    info!("Health check available at http://{}/health", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}

// Handle both SIGINT (Ctrl+C) and SIGTERM (Docker stop)
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        info!("SIGINT received, shutting down gracefully");
                    }
                    _ = sigterm.recv() => {
                        info!("SIGTERM received, shutting down gracefully");
                    }
                }
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("Shutdown signal received");
    }
}
