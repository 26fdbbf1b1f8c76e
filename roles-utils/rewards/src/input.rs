use serde::{Deserialize, Serialize};

/// One round of user-entered mining statistics.
///
/// Constructed fresh per submission and passed by reference into the
/// calculation functions; nothing in the engine mutates or caches it. All
/// fields default to zero so a partially filled web form still deserializes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationInput {
    /// Caller's hashrate contribution, in TH/s by convention.
    pub my_hashrate: f64,
    /// Aggregate group hashrate, same unit as `my_hashrate`. Must be greater
    /// than zero; the calculator rejects zero rather than treating it as
    /// "no share".
    pub total_hashrate: f64,
    /// Units of the mined currency produced by the whole group in the period.
    pub mined_amount: f64,
    /// Count of reward blocks produced by the group in the period.
    pub blocks_mined: f64,
    /// Caller's personally attributed reward-token blocks, already converted
    /// to token units.
    pub personal_block_tokens: f64,
    /// Green-tier boosts purchased by the group.
    pub boost_green: f64,
    /// Red-tier boosts purchased by the group.
    pub boost_red: f64,
    /// Violet-tier boosts purchased by the group. A violet boost costs 9x the
    /// green/red unit price.
    pub boost_violet: f64,
    /// Power draw in watts per hash-unit (W/TH).
    pub energy_efficiency: f64,
    /// Cost discount in percent. Out-of-range values are accepted
    /// arithmetically (negative = surcharge, >100 = negative cost); clamping
    /// is the caller's call.
    pub discount_percent: f64,
    /// Days of cost accrual. Scales electricity and service costs linearly.
    pub days: f64,
}
