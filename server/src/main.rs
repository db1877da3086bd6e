use std::sync::Arc;

use lead_server::{init_tracing, AppConfig, AppState, UreqTransport};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    init_tracing(&config.log_level);

    if config.fub_api_key.is_none() {
        warn!("FUB_API_KEY is not set; every submission will fail with 500");
    }

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, policy = ?config.relay_policy, timeout = ?config.fub_timeout, "lead server listening");

    let transport = Arc::new(UreqTransport::new(config.fub_timeout));
    lead_server::run(listener, AppState::new(config, transport)).await?;
    Ok(())
}
