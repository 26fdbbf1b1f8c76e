use serde::Deserialize;
use std::{env, fs};

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_address: String,
    pub price_feed_url: String,
    pub mined_currency_id: String,
    pub reward_token_id: String,
    pub price_poll_interval_secs: u64,
    pub price_stale_after_secs: u64,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Default, Deserialize)]
struct WebCalcConfig {
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    price_feed: PriceFeedConfig,
}

#[derive(Debug, Deserialize)]
struct ServerConfig {
    listen_address: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: Some("127.0.0.1:3080".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PriceFeedConfig {
    url: Option<String>,
    mined_currency_id: Option<String>,
    reward_token_id: Option<String>,
    poll_interval_secs: Option<u64>,
    stale_after_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
}

impl Default for PriceFeedConfig {
    fn default() -> Self {
        Self {
            url: Some("https://api.coingecko.com/api/v3".to_string()),
            mined_currency_id: Some("bitcoin".to_string()),
            reward_token_id: Some("gmt-token".to_string()),
            poll_interval_secs: Some(60),
            stale_after_secs: Some(300),
            request_timeout_secs: Some(30),
        }
    }
}

impl Config {
    pub fn from_args() -> Result<Self, Box<dyn std::error::Error>> {
        let args: Vec<String> = env::args().collect();

        // Config file is optional; defaults cover a local run against the
        // public CoinGecko API.
        let config_path = args
            .iter()
            .position(|arg| arg == "--config" || arg == "-c")
            .and_then(|i| args.get(i + 1))
            .map(|s| s.as_str());

        let file_config: WebCalcConfig = match config_path {
            Some(path) => {
                let config_str = fs::read_to_string(path)?;
                toml::from_str(&config_str)?
            }
            None => WebCalcConfig::default(),
        };

        let defaults = PriceFeedConfig::default();
        let server_defaults = ServerConfig::default();

        // Listen address from config file, with CLI override
        let listen_address = args
            .iter()
            .position(|arg| arg == "--listen-address" || arg == "-w")
            .and_then(|i| args.get(i + 1))
            .cloned()
            .or(file_config.server.listen_address)
            .or(server_defaults.listen_address)
            .ok_or("Missing required config: server.listen_address")?;

        let price_feed_url = file_config
            .price_feed
            .url
            .or(defaults.url)
            .ok_or("Missing required config: price_feed.url")?;

        let mined_currency_id = file_config
            .price_feed
            .mined_currency_id
            .or(defaults.mined_currency_id)
            .ok_or("Missing required config: price_feed.mined_currency_id")?;

        let reward_token_id = file_config
            .price_feed
            .reward_token_id
            .or(defaults.reward_token_id)
            .ok_or("Missing required config: price_feed.reward_token_id")?;

        Ok(Config {
            listen_address,
            price_feed_url,
            mined_currency_id,
            reward_token_id,
            price_poll_interval_secs: file_config
                .price_feed
                .poll_interval_secs
                .or(defaults.poll_interval_secs)
                .unwrap_or(60),
            price_stale_after_secs: file_config
                .price_feed
                .stale_after_secs
                .or(defaults.stale_after_secs)
                .unwrap_or(300),
            request_timeout_secs: file_config
                .price_feed
                .request_timeout_secs
                .or(defaults.request_timeout_secs)
                .unwrap_or(30),
        })
    }
}
