//! The two profit-breakdown operations.
//!
//! Both views share one operating-cost derivation parameterized by the spot
//! price, so the mined-currency and reward-token numbers can never diverge
//! through an edit to only one copy. Costs are tracked in the mined currency's
//! smallest subunit (1e8 per coin) between the discount step and the final
//! USD conversion, matching how the platform itself accounts for them.

use serde::{Deserialize, Serialize};

use crate::{error::InputError, input::CalculationInput};

/// Electricity rate in USD per kilowatt-hour.
const POWER_RATE_USD_PER_KWH: f64 = 0.05;
const HOURS_PER_DAY: f64 = 24.0;
const WATTS_PER_KILOWATT: f64 = 1000.0;
/// Flat service fee in USD per hash-unit per day.
const SERVICE_RATE_USD_PER_TH_DAY: f64 = 0.0089;
/// Smallest-subunit scale of the mined currency (satoshis per coin).
const SUBUNITS_PER_COIN: f64 = 1e8;
/// Violet boosts cost 9x the green/red unit price.
const VIOLET_PRICE_MULTIPLIER: f64 = 9.0;

/// Reward tokens distributed per mined block.
pub const TOKENS_PER_BLOCK: f64 = 323.3;

/// Profit breakdown denominated in the mined currency, expressed in USD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinedCurrencyBreakdown {
    pub gross_profit: f64,
    pub group_revenue: f64,
    pub electricity_cost: f64,
    pub service_cost: f64,
    pub net_profit: f64,
}

/// Profit breakdown denominated in the reward token, expressed in USD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardTokenBreakdown {
    pub gross_profit: f64,
    pub group_revenue: f64,
    pub group_cost: f64,
    pub group_net_profit: f64,
    pub electricity_cost: f64,
    pub service_cost: f64,
}

/// Compute the mined-currency profit view for one input round.
///
/// The caller's attributed share scales with the group's mined amount
/// (`mined_amount / total_hashrate * my_hashrate`); it is not a fraction in
/// [0, 1]. A negative `net_profit` is a valid outcome.
pub fn mined_currency_breakdown(
    input: &CalculationInput,
    price_usd: f64,
) -> Result<MinedCurrencyBreakdown, InputError> {
    if input.total_hashrate <= 0.0 {
        return Err(InputError::ZeroTotalHashrate);
    }
    if price_usd <= 0.0 {
        return Err(InputError::NonPositivePrice(price_usd));
    }

    let attributed_share = input.mined_amount / input.total_hashrate * input.my_hashrate;
    let gross_profit = attributed_share * price_usd;
    let group_revenue = input.mined_amount * price_usd;
    let (electricity_cost, service_cost) = operating_costs(input, price_usd);

    Ok(MinedCurrencyBreakdown {
        gross_profit,
        group_revenue,
        electricity_cost,
        service_cost,
        net_profit: gross_profit - electricity_cost - service_cost,
    })
}

/// Compute the reward-token profit view with the standard per-block rate.
pub fn reward_token_breakdown(
    input: &CalculationInput,
    price_usd: f64,
) -> Result<RewardTokenBreakdown, InputError> {
    reward_token_breakdown_with_rate(input, price_usd, TOKENS_PER_BLOCK)
}

/// Compute the reward-token profit view with an explicit tokens-per-block
/// rate, for events that adjust the block reward.
pub fn reward_token_breakdown_with_rate(
    input: &CalculationInput,
    price_usd: f64,
    tokens_per_block: f64,
) -> Result<RewardTokenBreakdown, InputError> {
    if price_usd <= 0.0 {
        return Err(InputError::NonPositivePrice(price_usd));
    }

    let gross_profit = input.personal_block_tokens * price_usd;
    let group_revenue = input.blocks_mined * tokens_per_block * price_usd;
    let boost_units =
        input.boost_green + input.boost_red + input.boost_violet * VIOLET_PRICE_MULTIPLIER;
    let group_cost = boost_units * price_usd;
    let (electricity_cost, service_cost) = operating_costs(input, price_usd);

    Ok(RewardTokenBreakdown {
        gross_profit,
        group_revenue,
        group_cost,
        group_net_profit: group_revenue - group_cost,
        electricity_cost,
        service_cost,
    })
}

/// Electricity and service cost in USD for one input round, both derived the
/// same way: base cost converted to currency subunits, discount applied in
/// subunits, then back to USD and scaled by elapsed days.
///
/// Callers must have validated `price_usd > 0` already.
fn operating_costs(input: &CalculationInput, price_usd: f64) -> (f64, f64) {
    let discount_factor = 1.0 - input.discount_percent / 100.0;

    let electricity_base_subunits = POWER_RATE_USD_PER_KWH * HOURS_PER_DAY
        * input.energy_efficiency
        / (price_usd * WATTS_PER_KILOWATT)
        * input.my_hashrate
        * SUBUNITS_PER_COIN;
    let service_base_subunits =
        SERVICE_RATE_USD_PER_TH_DAY / price_usd * input.my_hashrate * SUBUNITS_PER_COIN;

    let to_usd = |base_subunits: f64| {
        let discounted_subunits = base_subunits * discount_factor;
        discounted_subunits * price_usd / SUBUNITS_PER_COIN * input.days
    };

    (
        to_usd(electricity_base_subunits),
        to_usd(service_base_subunits),
    )
}
