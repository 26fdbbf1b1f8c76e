use std::sync::{Arc, RwLock};

use crate::{unix_now, SpotPrices};

/// In-memory storage for the latest validated spot-price pair.
///
/// Shared between the poll loop (writer) and request handlers (readers).
/// Holding no data counts as stale.
pub struct PriceStorage {
    prices: Arc<RwLock<Option<SpotPrices>>>,
}

impl PriceStorage {
    pub fn new() -> Self {
        Self {
            prices: Arc::new(RwLock::new(None)),
        }
    }

    pub fn update(&self, prices: SpotPrices) {
        if let Ok(mut guard) = self.prices.write() {
            *guard = Some(prices);
        }
    }

    pub fn get(&self) -> Option<SpotPrices> {
        self.prices.read().ok().and_then(|guard| *guard)
    }

    pub fn is_stale(&self, threshold_secs: u64) -> bool {
        match self.get() {
            Some(prices) => unix_now().saturating_sub(prices.timestamp) > threshold_secs,
            None => true,
        }
    }
}

impl Default for PriceStorage {
    fn default() -> Self {
        Self::new()
    }
}
