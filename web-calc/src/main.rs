use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tracing::{error, info};

use price_feed::{PriceFeedClient, PriceStorage};
use web_calc::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_args()?;
    info!("Starting reward calculator service");
    info!("Price feed URL: {}", config.price_feed_url);
    info!(
        "Assets: {} / {}",
        config.mined_currency_id, config.reward_token_id
    );
    info!("Web server address: {}", config.listen_address);
    info!("Price poll interval: {}s", config.price_poll_interval_secs);

    // Shared latest-prices storage
    let storage = Arc::new(PriceStorage::new());

    let client = PriceFeedClient::new(
        config.price_feed_url.clone(),
        config.mined_currency_id.clone(),
        config.reward_token_id.clone(),
        config.request_timeout_secs,
    )?;

    // Spawn the price polling loop
    let storage_clone = storage.clone();
    let poll_interval = config.price_poll_interval_secs;
    tokio::spawn(async move {
        poll_spot_prices(client, storage_clone, poll_interval).await;
    });

    // Start HTTP server
    web_calc::web::run_http_server(
        config.listen_address,
        storage,
        config.price_stale_after_secs,
    )
    .await
}

async fn poll_spot_prices(
    client: PriceFeedClient,
    storage: Arc<PriceStorage>,
    poll_interval_secs: u64,
) {
    let mut interval = time::interval(Duration::from_secs(poll_interval_secs));
    let mut last_success: Option<bool> = None;

    loop {
        interval.tick().await;

        match client.fetch().await {
            Ok(prices) => {
                if should_log_outcome(last_success, true) {
                    info!(
                        "Fetched spot prices: mined currency ${}, reward token ${}",
                        prices.mined_currency_usd, prices.reward_token_usd
                    );
                }
                last_success = Some(true);
                storage.update(prices);
            }
            Err(e) => {
                if should_log_outcome(last_success, false) {
                    error!("Failed to fetch spot prices: {}", e);
                }
                last_success = Some(false);
            }
        }
    }
}

/// Log only on outcome transitions so a long outage does not spam the log.
/// The very first poll counts as a transition either way, so a fresh deploy
/// pointed at a bad URL still reports its failure.
fn should_log_outcome(last_success: Option<bool>, success: bool) -> bool {
    last_success != Some(success)
}
