use thiserror::Error;

/// Input conditions that make a calculation impossible.
///
/// Raised before any arithmetic that would divide by the offending value, so
/// the engine never produces NaN or infinite fields.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("total group hashrate must be greater than zero")]
    ZeroTotalHashrate,

    #[error("spot price must be positive, got {0}")]
    NonPositivePrice(f64),
}
