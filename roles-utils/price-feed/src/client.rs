use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::{error::PriceFeedError, unix_now, SpotPrices};

/// One asset entry in a `simple/price` response, e.g. `{"usd": 60000.0}`.
#[derive(Debug, Deserialize)]
struct AssetQuote {
    usd: Option<f64>,
}

/// HTTP client for a CoinGecko-compatible `simple/price` endpoint.
pub struct PriceFeedClient {
    http: reqwest::Client,
    base_url: String,
    mined_currency_id: String,
    reward_token_id: String,
}

impl PriceFeedClient {
    pub fn new(
        base_url: String,
        mined_currency_id: String,
        reward_token_id: String,
        request_timeout_secs: u64,
    ) -> Result<Self, PriceFeedError> {
        let http = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(300))
            .pool_max_idle_per_host(1)
            .timeout(Duration::from_secs(request_timeout_secs))
            .build()
            .map_err(|e| PriceFeedError::ClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url,
            mined_currency_id,
            reward_token_id,
        })
    }

    /// Fetch both USD spot prices in one request.
    ///
    /// A missing asset or a non-positive quote is an error; a bad pair is
    /// never handed to the storage layer.
    pub async fn fetch(&self) -> Result<SpotPrices, PriceFeedError> {
        let url = format!(
            "{}/simple/price?ids={},{}&vs_currencies=usd",
            self.base_url, self.mined_currency_id, self.reward_token_id
        );
        debug!("Fetching spot prices from {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| PriceFeedError::Request(e.to_string()))?;
        if !response.status().is_success() {
            return Err(PriceFeedError::HttpStatus(response.status().as_u16()));
        }
        let body = response
            .text()
            .await
            .map_err(|e| PriceFeedError::Request(e.to_string()))?;

        parse_quotes(&body, &self.mined_currency_id, &self.reward_token_id)
    }
}

/// Parse a `simple/price` response body into a validated price pair.
///
/// Split out of `fetch` so the validation rules are testable without a
/// network.
pub fn parse_quotes(
    body: &str,
    mined_currency_id: &str,
    reward_token_id: &str,
) -> Result<SpotPrices, PriceFeedError> {
    let quotes: HashMap<String, AssetQuote> = serde_json::from_str(body)?;
    Ok(SpotPrices {
        mined_currency_usd: quote_usd(&quotes, mined_currency_id)?,
        reward_token_usd: quote_usd(&quotes, reward_token_id)?,
        timestamp: unix_now(),
    })
}

fn quote_usd(quotes: &HashMap<String, AssetQuote>, asset: &str) -> Result<f64, PriceFeedError> {
    let quote = quotes
        .get(asset)
        .ok_or_else(|| PriceFeedError::MissingAsset(asset.to_string()))?;
    match quote.usd {
        Some(price) if price > 0.0 => Ok(price),
        Some(price) => Err(PriceFeedError::NonPositivePrice {
            asset: asset.to_string(),
            price,
        }),
        None => Err(PriceFeedError::MissingAsset(asset.to_string())),
    }
}
