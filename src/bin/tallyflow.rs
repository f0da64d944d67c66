//! tallyflow Binary - Number Windows + Ranking Analytics
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin tallyflow
//! ```
//!
//! ## Environment Variables
//!
//! - API_BASE_URL - Upstream API base address (required, BASE_URL accepted as fallback)
//! - AUTH_TOKEN - Bearer credential forwarded upstream (optional)
//! - PORT - Listen port (default: 9876)
//! - BIND_ADDR - Listen interface (default: 0.0.0.0)
//! - WINDOW_SIZE - Capacity of each number window (default: 10)
//! - CACHE_TTL - Ranking cache lifetime in seconds (default: 300)
//! - FETCH_TIMEOUT_MS - Per-request upstream timeout (default: 500)
//! - RUST_LOG - Logging level (optional, default: info)

use tallyflow::server::{self, AppState};
use tallyflow::AggregatorConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = AggregatorConfig::from_env()?;

    log::info!("🚀 Starting tallyflow");
    log::info!("   Upstream: {}", config.api_base_url);
    log::info!("   Window size: {}", config.window_size);
    log::info!("   Cache TTL: {}s", config.cache_ttl.as_secs());
    log::info!("   Fetch timeout: {}ms", config.fetch_timeout.as_millis());
    log::info!(
        "   Auth token: {}",
        if config.auth_token.is_some() { "set" } else { "not set" }
    );

    let state = AppState::from_config(&config)?;
    server::serve(config.bind_addr, server::router(state)).await?;

    log::info!("👋 tallyflow stopped");
    Ok(())
}
