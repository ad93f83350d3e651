use anyhow::Result;
use lingua_gateway::api::{self, AppState};
use lingua_gateway::config::Config;
use lingua_gateway::startup;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lingua_gateway=info".parse()?),
        )
        .init();

    info!("Starting language service gateway");

    // Load configuration from environment
    let config = Config::from_env()?;
    let port = config.port;
    let state = AppState::new(config)?;

    // Bring up the external backends before taking traffic
    startup::run(&state).await?;

    let app = api::router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
