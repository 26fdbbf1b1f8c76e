use std::convert::Infallible;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info};

use price_feed::{PriceStorage, SpotPrices};
use rewards::{mined_currency_breakdown, reward_token_breakdown, CalculationInput, InputError};
use web_assets::formatting::{format_usd, format_usd_signed};

const CALCULATOR_PAGE: &str = include_str!("../templates/calculator.html");

const CALCULATOR_FAVICON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><circle cx="12" cy="12" r="11" fill="#1a1a2e"/><rect x="6" y="5" width="12" height="14" rx="2" fill="none" stroke="#f7931a" stroke-width="1.5"/><rect x="8" y="7" width="8" height="3" rx="0.5" fill="#f7931a"/><circle cx="9" cy="13" r="1" fill="#f7931a"/><circle cx="12" cy="13" r="1" fill="#f7931a"/><circle cx="15" cy="13" r="1" fill="#f7931a"/><circle cx="9" cy="16" r="1" fill="#f7931a"/><circle cx="12" cy="16" r="1" fill="#f7931a"/><circle cx="15" cy="16" r="1" fill="#f7931a"/></svg>"##;

pub async fn run_http_server(
    address: String,
    storage: Arc<PriceStorage>,
    stale_after_secs: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(&address).await?;
    info!("🌐 Reward calculator listening on http://{}", address);

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let storage = storage.clone();

        tokio::task::spawn(async move {
            let service = service_fn(move |req| {
                let storage = storage.clone();
                async move { handle_request(req, storage, stale_after_secs).await }
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                error!("Error serving connection: {:?}", err);
            }
        });
    }
}

async fn handle_request(
    req: Request<Incoming>,
    storage: Arc<PriceStorage>,
    stale_after_secs: u64,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let response = match (req.method(), req.uri().path()) {
        (&Method::GET, "/favicon.ico") | (&Method::GET, "/favicon.svg") => Ok(serve_favicon()),
        (&Method::GET, "/") => Response::builder()
            .header("content-type", "text/html; charset=utf-8")
            .body(Full::new(Bytes::from(CALCULATOR_PAGE))),
        (&Method::GET, "/api/prices") => serve_prices(storage, stale_after_secs),
        (&Method::POST, "/api/calculate") => {
            handle_calculate(req, storage, stale_after_secs).await
        }
        (&Method::GET, "/health") => {
            let stale = storage.is_stale(stale_after_secs);
            let status_code = if stale {
                StatusCode::SERVICE_UNAVAILABLE
            } else {
                StatusCode::OK
            };
            let json_response = json!({
                "healthy": !stale,
                "prices_stale": stale
            });
            Response::builder()
                .status(status_code)
                .header("content-type", "application/json")
                .body(Full::new(Bytes::from(json_response.to_string())))
        }
        _ => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::from("Not Found"))),
    };

    Ok(response.unwrap_or_else(|e| {
        error!("Error building response: {:?}", e);
        Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .body(Full::new(Bytes::from("Internal Server Error")))
            .unwrap()
    }))
}

fn serve_favicon() -> Response<Full<Bytes>> {
    Response::builder()
        .header("content-type", "image/svg+xml")
        .header("cache-control", "public, max-age=86400")
        .body(Full::new(Bytes::from(CALCULATOR_FAVICON_SVG)))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}

/// The latest price pair, but only while it is fresh. Absent and stale both
/// count as not ready; handlers answer 503 instead of using old quotes.
fn ready_prices(storage: &PriceStorage, stale_after_secs: u64) -> Option<SpotPrices> {
    if storage.is_stale(stale_after_secs) {
        None
    } else {
        storage.get()
    }
}

fn serve_prices(
    storage: Arc<PriceStorage>,
    stale_after_secs: u64,
) -> Result<Response<Full<Bytes>>, hyper::http::Error> {
    match ready_prices(&storage, stale_after_secs) {
        Some(prices) => json_response(
            StatusCode::OK,
            json!({
                "mined_currency_usd": prices.mined_currency_usd,
                "reward_token_usd": prices.reward_token_usd,
                "timestamp": prices.timestamp
            }),
        ),
        None => json_response(
            StatusCode::SERVICE_UNAVAILABLE,
            json!({ "error": "Spot prices are unavailable or stale" }),
        ),
    }
}

async fn handle_calculate(
    req: Request<Incoming>,
    storage: Arc<PriceStorage>,
    stale_after_secs: u64,
) -> Result<Response<Full<Bytes>>, hyper::http::Error> {
    // Fresh prices must be resolved before the calculator runs; without them
    // the engine is never invoked.
    let prices = match ready_prices(&storage, stale_after_secs) {
        Some(prices) => prices,
        None => {
            return json_response(
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": "Spot prices are unavailable or stale" }),
            )
        }
    };

    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            error!("Failed to read request body: {}", e);
            return json_response(
                StatusCode::BAD_REQUEST,
                json!({ "error": "Failed to read request body" }),
            );
        }
    };

    let input: CalculationInput = match serde_json::from_slice(&body) {
        Ok(input) => input,
        Err(e) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                json!({ "error": format!("Invalid calculation input: {}", e) }),
            )
        }
    };

    match calculate_response(&input, &prices) {
        Ok(value) => json_response(StatusCode::OK, value),
        Err(e) => json_response(StatusCode::BAD_REQUEST, json!({ "error": e.to_string() })),
    }
}

/// Run both breakdowns and assemble the response payload.
///
/// Raw values carry full precision; the `_display` strings are what the page
/// renders.
pub fn calculate_response(
    input: &CalculationInput,
    prices: &SpotPrices,
) -> Result<serde_json::Value, InputError> {
    let mined = mined_currency_breakdown(input, prices.mined_currency_usd)?;
    let token = reward_token_breakdown(input, prices.reward_token_usd)?;

    Ok(json!({
        "prices": {
            "mined_currency_usd": prices.mined_currency_usd,
            "reward_token_usd": prices.reward_token_usd,
            "timestamp": prices.timestamp
        },
        "mined": {
            "gross_profit": mined.gross_profit,
            "gross_profit_display": format_usd(mined.gross_profit),
            "group_revenue": mined.group_revenue,
            "group_revenue_display": format_usd(mined.group_revenue),
            "electricity_cost": mined.electricity_cost,
            "electricity_cost_display": format_usd(mined.electricity_cost),
            "service_cost": mined.service_cost,
            "service_cost_display": format_usd(mined.service_cost),
            "net_profit": mined.net_profit,
            "net_profit_display": format_usd_signed(mined.net_profit)
        },
        "token": {
            "gross_profit": token.gross_profit,
            "gross_profit_display": format_usd(token.gross_profit),
            "group_revenue": token.group_revenue,
            "group_revenue_display": format_usd(token.group_revenue),
            "group_cost": token.group_cost,
            "group_cost_display": format_usd(token.group_cost),
            "group_net_profit": token.group_net_profit,
            "group_net_profit_display": format_usd_signed(token.group_net_profit),
            "electricity_cost": token.electricity_cost,
            "electricity_cost_display": format_usd(token.electricity_cost),
            "service_cost": token.service_cost,
            "service_cost_display": format_usd(token.service_cost)
        }
    }))
}

fn json_response(
    status: StatusCode,
    value: serde_json::Value,
) -> Result<Response<Full<Bytes>>, hyper::http::Error> {
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(value.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_prices() -> SpotPrices {
        SpotPrices {
            mined_currency_usd: 60_000.0,
            reward_token_usd: 0.05,
            timestamp: 1_700_000_000,
        }
    }

    fn sample_input() -> CalculationInput {
        CalculationInput {
            my_hashrate: 100.0,
            total_hashrate: 1000.0,
            mined_amount: 1.0,
            blocks_mined: 2.0,
            personal_block_tokens: 50.0,
            boost_green: 10.0,
            boost_red: 0.0,
            boost_violet: 1.0,
            energy_efficiency: 30.0,
            discount_percent: 0.0,
            days: 1.0,
        }
    }

    #[test]
    fn test_calculate_response_payload() {
        let value = calculate_response(&sample_input(), &sample_prices()).unwrap();

        let mined = &value["mined"];
        assert!((mined["gross_profit"].as_f64().unwrap() - 6000.0).abs() < 1e-6);
        assert_eq!(mined["gross_profit_display"], "$6,000.00");
        assert_eq!(mined["group_revenue_display"], "$60,000.00");
        assert!((mined["electricity_cost"].as_f64().unwrap() - 3.6).abs() < 1e-9);

        let token = &value["token"];
        assert!((token["group_revenue"].as_f64().unwrap() - 32.33).abs() < 1e-9);
        assert!((token["group_cost"].as_f64().unwrap() - 0.95).abs() < 1e-9);
        assert!((token["group_net_profit"].as_f64().unwrap() - 31.38).abs() < 1e-9);
        assert_eq!(token["group_net_profit_display"], "+$31.38");

        assert_eq!(value["prices"]["mined_currency_usd"], 60_000.0);
    }

    fn unix_now() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    #[test]
    fn test_prices_endpoint_returns_503_before_first_fetch() {
        let storage = Arc::new(PriceStorage::new());
        let response = serve_prices(storage, 300).unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_prices_endpoint_returns_503_when_stale() {
        let storage = Arc::new(PriceStorage::new());
        storage.update(SpotPrices {
            timestamp: 1,
            ..sample_prices()
        });
        let response = serve_prices(storage, 300).unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_prices_endpoint_returns_200_while_fresh() {
        let storage = Arc::new(PriceStorage::new());
        storage.update(SpotPrices {
            timestamp: unix_now(),
            ..sample_prices()
        });
        let response = serve_prices(storage, 300).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_stale_prices_are_never_handed_to_the_calculator() {
        // Calculation requests share the same readiness gate as /api/prices:
        // old quotes are as unusable as missing ones.
        let storage = PriceStorage::new();
        assert!(ready_prices(&storage, 300).is_none());

        storage.update(SpotPrices {
            timestamp: 1,
            ..sample_prices()
        });
        assert!(ready_prices(&storage, 300).is_none());

        storage.update(SpotPrices {
            timestamp: unix_now(),
            ..sample_prices()
        });
        assert!(ready_prices(&storage, 300).is_some());
    }

    #[test]
    fn test_calculate_response_rejects_zero_group_hashrate() {
        let mut input = sample_input();
        input.total_hashrate = 0.0;
        let err = calculate_response(&input, &sample_prices()).unwrap_err();
        assert_eq!(err, InputError::ZeroTotalHashrate);
    }

    #[test]
    fn test_net_profit_display_carries_a_sign() {
        // Costs dominate: negative net profit renders with a minus sign.
        let input = CalculationInput {
            my_hashrate: 500.0,
            total_hashrate: 1000.0,
            mined_amount: 0.0001,
            energy_efficiency: 90.0,
            days: 30.0,
            ..Default::default()
        };
        let value = calculate_response(&input, &sample_prices()).unwrap();
        let display = value["mined"]["net_profit_display"].as_str().unwrap();
        assert!(display.starts_with("-$"), "got {display}");
    }
}
