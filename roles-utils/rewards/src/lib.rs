//! Reward and operating-cost calculations for competitive cloud-mining events.
//!
//! The engine converts one round of group mining statistics (hashrate shares,
//! mined amount, block counts, boost purchases) plus two externally supplied
//! spot prices into two profit breakdowns: one denominated in the mined
//! currency, one in the reward token. Everything here is a pure function over
//! its arguments; price fetching and presentation live in sibling crates.

pub mod calculator;
pub mod error;
pub mod input;

pub use calculator::{
    mined_currency_breakdown, reward_token_breakdown, reward_token_breakdown_with_rate,
    MinedCurrencyBreakdown, RewardTokenBreakdown, TOKENS_PER_BLOCK,
};
pub use error::InputError;
pub use input::CalculationInput;
