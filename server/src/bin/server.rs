//! Bookstore HTTP server.
//!
//! Serves the catalog, account and order API over `PostgreSQL`, with
//! Prometheus metrics on a separate listener.

use bookstore_server::{
    Config, ResourceManager, build_router, metrics::register_business_metrics,
    server::cors_layer,
};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bookstore_server=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Bookstore HTTP Server");

    // Load configuration
    let config = Config::from_env();
    info!(
        address = %config.server.addr(),
        metrics_address = %config.server.metrics_addr(),
        frontend_url = %config.server.frontend_url,
        "Configuration loaded"
    );

    // Metrics exporter
    let metrics_addr: SocketAddr = config.server.metrics_addr().parse()?;
    PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .install()?;
    register_business_metrics();
    info!(address = %metrics_addr, "Prometheus exporter listening");

    // Database and stores
    let resources = ResourceManager::from_config(&config).await?;
    info!("Database connected");

    let app = build_router(resources.app_state()).layer(cors_layer(&config.server.frontend_url)?);

    let addr = config.server.addr();
    info!(address = %addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // ClientIp falls back to the peer address when no proxy header is present
    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    resources.close().await;

    if let Err(e) = served {
        error!(error = %e, "HTTP server failed");
        return Err(e.into());
    }

    info!("Server shut down");
    Ok(())
}

/// Graceful shutdown signal handler.
///
/// Waits for:
/// - Ctrl+C (SIGINT)
/// - SIGTERM (in production environments)
///
/// A handler that cannot be installed never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
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
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
