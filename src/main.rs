// src/main.rs

use dotenvy::dotenv;
use quiz_insights::config::Config;
use quiz_insights::fetch::BasicClient;
use quiz_insights::routes;
use quiz_insights::snapshot::Snapshot;
use quiz_insights::state::AppState;
use quiz_insights::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env()?;

    let _guard = logging::init(&config);

    if config.accept_invalid_certs {
        tracing::warn!("ACCEPT_INVALID_CERTS is set: upstream TLS certificates are NOT verified");
    }

    let client = BasicClient::new(config.accept_invalid_certs)?;

    // One pass at startup; every request reads this snapshot.
    tracing::info!("Building snapshot from upstream feeds...");
    let snapshot = Snapshot::build(&client, &config).await;

    let state = AppState::new(snapshot);

    // Create the Axum application router
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);

    // Start the server
    axum::serve(listener, app).await?;

    Ok(())
}
