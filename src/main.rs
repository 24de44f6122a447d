//! vibe-dl server binary.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use vibe_dl::{Config, JobTracker, RapidApiClient, run_with_shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("vibe_dl=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(env_filter)
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        address = %config.server.api.bind_address,
        provider_host = %config.provider.host,
        "Starting vibe-dl"
    );

    let provider = Arc::new(RapidApiClient::new(&config.provider)?);
    let tracker = JobTracker::new(config, provider)?;

    tracker.start_reaper()?;

    let api = Arc::new(tracker.clone()).spawn_api_server();
    tokio::spawn(async move {
        match api.await {
            Ok(Err(e)) => {
                tracing::error!(error = %e, "API server failed");
                std::process::exit(1);
            }
            Err(e) => tracing::error!(error = %e, "API server task panicked"),
            Ok(Ok(())) => {}
        }
    });

    run_with_shutdown(tracker).await?;
    Ok(())
}
