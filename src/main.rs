use std::sync::Arc;

use stormboard::{load_config, serve, AppState, Stormboard, StormboardError};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), StormboardError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stormboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config_path =
        std::env::var("STORMBOARD_CONFIG").unwrap_or_else(|_| "stormboard.toml".to_string());

    info!("Loading configuration from {}", config_path);
    let config = load_config(&config_path)?;
    let bind_addr = config.server.bind_addr();

    let board = Stormboard::new(config)?;
    let state = AppState::new(Arc::new(board));

    serve(state, &bind_addr).await
}
