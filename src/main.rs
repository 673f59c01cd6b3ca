use chrono::Local;
use duty_calendar::{
    initialize, models::DateKey, router, AppState, ServerConfig, Session, Store, StoreConfig,
};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let store_config = StoreConfig::from_env();
    let server_config = ServerConfig::from_env();

    let store = Store::new(initialize(&store_config));
    let today = DateKey::new(Local::now().date_naive());
    let session = Session::open(&store, today).await;
    let app = router(AppState::new(store, session));

    let addr = SocketAddr::from(([0, 0, 0, 0], server_config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
