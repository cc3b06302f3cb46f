mod config;
mod error;
mod exchange;
mod handlers;
mod models;
mod router;
mod seed;
mod state;

use config::Config;
use router::create_router;
use state::AppState;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Starting exchange gateway");

    let config = Config::from_env();
    let exchange = exchange::start(&config)?;

    if config.seed_demo {
        seed::seed_demo(&exchange).await?;
    }

    let state = AppState::new(exchange);
    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    tracing::info!("Listening on {}", config.listen_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
