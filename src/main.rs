//! Order Admin API - Binary Entry Point
//!
//! Serves the GraphQL API over the order document store and the analytics
//! database.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use order_admin::api::{build_schema, create_router, AppState};
use order_admin::config::ServerConfig;
use order_admin::order_store::OrderStore;
use order_admin::telemetry_store::TelemetryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(version = order_admin::VERSION, dev = config.dev, "starting order admin API");

    let orders = OrderStore::open(&config.orders_file_path)
        .with_context(|| format!("opening {}", config.orders_file_path.display()))?;
    let telemetry = TelemetryStore::connect(
        &config.analytics_database_url,
        config.analytics_max_connections,
    )
    .await
    .context("connecting to the analytics database")?;

    let schema = build_schema(Arc::new(orders), telemetry.clone());
    let app = create_router(AppState::new(schema, config.dev));

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(address = %addr, "listening on http://{addr}/graphql");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    telemetry.close().await;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
