//! Fixed-point fee arithmetic.
//!
//! All rates and shares are fractions of [`DENOMINATOR`] (1e18 = 100%).
//! Results truncate toward zero.

use odra::casper_types::U256;
use crate::types::DENOMINATOR;

/// `amount * fraction / DENOMINATOR`, truncated
pub fn apply_fraction(amount: U256, fraction: U256) -> U256 {
    amount * fraction / U256::from(DENOMINATOR)
}

/// Split a transfer into `(fee, net)` for the given fee rate
pub fn split_fee(amount: U256, rate: U256) -> (U256, U256) {
    let fee = apply_fraction(amount, rate);
    (fee, amount - fee)
}

/// Complement of a share: `DENOMINATOR - share`
pub fn complement(share: U256) -> U256 {
    U256::from(DENOMINATOR) - share
}

/// Split the collected fee balance for conversion.
///
/// Half of the liquidity fraction stays as tokens to be paired with settlement;
/// everything else is sold. Returns `(tokens_to_swap, tokens_for_liquidity)`.
pub fn conversion_split(held: U256, liquidity_share: U256) -> (U256, U256) {
    let tokens_for_liquidity = apply_fraction(held, liquidity_share) / U256::from(2u64);
    (held - tokens_for_liquidity, tokens_for_liquidity)
}

/// Split settlement proceeds into `(revenue, settlement_for_liquidity)`
pub fn proceeds_split(proceeds: U256, revenue_share: U256) -> (U256, U256) {
    let revenue = apply_fraction(proceeds, revenue_share);
    (revenue, proceeds - revenue)
}
