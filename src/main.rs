use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use monji_web::cli::Cli;
use monji_web::router::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up API_BASE_URL, APP_ENV, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("monji_web=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    // Environment profile first, then command-line flags on top
    let mut config = monji_web::config::config().clone();
    cli.apply(&mut config);
    tracing::info!("Starting Monji web in {:?} mode", config.environment);
    tracing::info!("Monji API at {}", config.backend.base_url);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config).context("invalid backend configuration")?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Monji web listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server")?;
    Ok(())
}
