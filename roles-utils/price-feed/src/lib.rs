//! Spot-price collaborator for the reward calculator.
//!
//! Fetches USD quotes for the mined currency and the reward token from a
//! CoinGecko-compatible `simple/price` endpoint, validates them, and keeps the
//! latest pair in memory for the web role. The calculator itself is never
//! invoked until both prices have been fetched and validated positive.

use serde::{Deserialize, Serialize};

pub mod client;
pub mod error;
pub mod storage;

pub use client::PriceFeedClient;
pub use error::PriceFeedError;
pub use storage::PriceStorage;

/// The two spot prices a calculation needs, both validated positive at parse
/// time, plus the Unix second they were fetched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotPrices {
    pub mined_currency_usd: f64,
    pub reward_token_usd: f64,
    pub timestamp: u64,
}

pub(crate) fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
