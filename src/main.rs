use std::net::SocketAddr;
use switchdesk::config::Config;
use switchdesk::infrastructure::metrics::init_metrics;
use switchdesk::interface::api::build_router;
use switchdesk::Switchboard;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Switchdesk call switchboard");
    info!("Configuration loaded: {:?}", config);

    info!("Initializing Prometheus metrics exporter");
    let prometheus_handle = init_metrics()?;

    let switchboard = Switchboard::new(config.ringing_timeout());
    match config.ringing_timeout() {
        Some(timeout) => info!("Ringing timeout: {:?}", timeout),
        None => info!("Ringing timeout disabled"),
    }

    let app = build_router(switchboard, prometheus_handle);
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    let local_addr: SocketAddr = listener.local_addr()?;
    info!("Listening on http://{}", local_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
