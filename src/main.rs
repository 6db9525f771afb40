use std::net::{IpAddr, SocketAddr};

use anyhow::Context;
use tokio::signal;
use tracing::info;

use movie_catalog_api as api;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    let store = api::store::MovieStore::from_seed()
        .context("failed to parse bundled movie seed data")?;
    info!("Seeded movie catalog with {} movies", store.len());

    let state = api::AppState::new(cfg.clone(), store);
    let app = api::app_router(state);

    // Bind and serve
    let host: IpAddr = cfg.host.parse().context("invalid host address")?;
    let addr = SocketAddr::new(host, cfg.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🚀 movie-catalog-api listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
