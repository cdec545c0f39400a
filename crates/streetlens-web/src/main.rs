//! Streetlens Web Server
//!
//! Run with: cargo run -p streetlens-web

use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

use streetlens_config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Streetlens server...");

    let config = Config::load()?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let state = streetlens_web::state::AppState::from_config(config)?;
    let app = streetlens_web::router::build_router(state);

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
