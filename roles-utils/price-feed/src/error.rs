use thiserror::Error;

#[derive(Debug, Error)]
pub enum PriceFeedError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Price request failed: {0}")]
    Request(String),

    #[error("Price endpoint returned HTTP status {0}")]
    HttpStatus(u16),

    #[error("Failed to decode price response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Asset missing from price response: {0}")]
    MissingAsset(String),

    #[error("Non-positive price for {asset}: {price}")]
    NonPositivePrice { asset: String, price: f64 },
}
