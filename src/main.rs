use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use innews::config::Config;
use innews::fetcher::Fetcher;
use innews::routes::{self, AppState};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "innews=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path =
        std::env::var("INNEWS_CONFIG").unwrap_or_else(|_| "innews.toml".to_string());
    let config = Config::load_or_default(&config_path)?;
    info!("Reading feeds from {}", config.base_url);

    let fetcher = Fetcher::new(&config)?;
    let bind_address = config.bind_address.clone();
    let app = routes::router(Arc::new(AppState { config, fetcher }));

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Server starting on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
