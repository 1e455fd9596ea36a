use std::error::Error;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::oneshot;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ecgenius::api::RestApi;
use ecgenius::client::{ApiClient, HttpTransport};
use ecgenius::config::load_config;
use ecgenius::controller::PageController;
use ecgenius::EcgError;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ecgenius=info,warp=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("ECGENIUS_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.yaml"));
    let config = load_config(&config_path).map_err(EcgError::from)?;

    tracing::info!(
        register = %config.api.register_url(),
        report = %config.api.report_url(),
        timeout_secs = config.api.timeout_secs,
        "using prediction service"
    );

    let transport = HttpTransport::new(config.api.timeout());
    let client = ApiClient::new(transport, &config.api);
    let controller = Arc::new(PageController::new(client));
    let api = RestApi::new(Arc::clone(&controller));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|_| EcgError::Address(format!("{}:{}", config.server.host, config.server.port)))?;

    tracing::info!(%addr, "starting server");

    // Create a channel for shutdown signal
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let routes = api.routes();
    let (_, server) = warp::serve(routes).bind_with_graceful_shutdown(addr, async move {
        shutdown_rx.await.ok();
        tracing::info!("shutting down server");
    });

    let server_handle = tokio::spawn(server);

    signal::ctrl_c().await?;
    tracing::info!("Ctrl+C received, starting graceful shutdown");

    shutdown_tx.send(()).ok();
    server_handle.await?;

    tracing::info!("server shutdown complete");
    Ok(())
}
