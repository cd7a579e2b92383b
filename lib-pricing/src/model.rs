//! Pool Pricing Model (Pure Functions)
//!
//! Deterministic amount computation for pool operations.
//!
//! # Rules (enforced in code)
//!
//! - No floats - all arithmetic is u64 integer arithmetic
//! - Every division truncates toward zero, so rounding always favors the pool
//! - Every multiplication, addition and subtraction is checked
//! - A zero divisor is an error, never a zero result
//!
//! # Settlement Integration
//!
//! Callers pass reserve levels as of the start of their invocation. The
//! functions never read state.

use lib_types::Amount;
use serde::{Deserialize, Serialize};

use crate::errors::{PricingError, PricingResult};
use crate::math::integer_sqrt;

/// Default swap fee numerator (5 / 1000 = 0.5%)
pub const DEFAULT_FEE_BPS: u64 = 5;

/// Default fee denominator, also the liquidity burned on first funding
pub const DEFAULT_SCALE: u64 = 1_000;

// =============================================================================
// FEE SCHEDULE
// =============================================================================

/// Swap fee expressed as `fee_bps / scale`
///
/// `scale` doubles as the minimum-liquidity offset withheld when a pool is
/// funded for the first time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub fee_bps: u64,
    pub scale: u64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            fee_bps: DEFAULT_FEE_BPS,
            scale: DEFAULT_SCALE,
        }
    }
}

impl FeeSchedule {
    /// Create a validated schedule; requires `fee_bps < scale`
    pub fn new(fee_bps: u64, scale: u64) -> PricingResult<Self> {
        let schedule = Self { fee_bps, scale };
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn validate(&self) -> PricingResult<()> {
        if self.scale == 0 || self.fee_bps >= self.scale {
            return Err(PricingError::InvalidFeeSchedule {
                fee_bps: self.fee_bps,
                scale: self.scale,
            });
        }
        Ok(())
    }

    /// Portion of each input unit that reaches the curve: `scale - fee_bps`
    pub fn factor(&self) -> PricingResult<u64> {
        self.scale
            .checked_sub(self.fee_bps)
            .ok_or(PricingError::Underflow {
                operation: "fee factor",
            })
    }
}

// =============================================================================
// LIQUIDITY SHARES
// =============================================================================

/// Pool shares minted for a two-sided deposit
///
/// ```text
/// minted = min(a_amt / a_sup, b_amt / b_sup) * issued
/// ```
///
/// `issued` is the circulating share supply before the deposit. Taking the
/// smaller per-asset ratio caps the mint at what the scarcer contribution
/// justifies.
pub fn mint_tokens(
    issued: Amount,
    a_sup: Amount,
    b_sup: Amount,
    a_amt: Amount,
    b_amt: Amount,
) -> PricingResult<Amount> {
    let a_ratio = a_amt
        .checked_div(a_sup)
        .ok_or(PricingError::DivisionByZero { operand: "a_sup" })?;
    let b_ratio = b_amt
        .checked_div(b_sup)
        .ok_or(PricingError::DivisionByZero { operand: "b_sup" })?;

    a_ratio
        .min(b_ratio)
        .checked_mul(issued)
        .ok_or(PricingError::Overflow { operation: "mint" })
}

/// Reserve units returned for burning `burn_amt` shares
///
/// ```text
/// returned = reserve_sup * (burn_amt / issued)
/// ```
///
/// Called once per reserve asset.
pub fn burn_tokens(issued: Amount, reserve_sup: Amount, burn_amt: Amount) -> PricingResult<Amount> {
    let ratio = burn_amt
        .checked_div(issued)
        .ok_or(PricingError::DivisionByZero { operand: "issued" })?;

    reserve_sup
        .checked_mul(ratio)
        .ok_or(PricingError::Overflow { operation: "burn" })
}

/// Shares minted by the very first funding of an empty pool
///
/// ```text
/// seeded = isqrt(a_amt * b_amt) - scale
/// ```
///
/// The `scale` offset is never issued to anyone. Deposits whose geometric
/// mean does not exceed it are rejected.
pub fn first_liquidity(a_amt: Amount, b_amt: Amount, fees: &FeeSchedule) -> PricingResult<Amount> {
    let product = a_amt.checked_mul(b_amt).ok_or(PricingError::Overflow {
        operation: "first liquidity product",
    })?;

    integer_sqrt(product)
        .checked_sub(fees.scale)
        .ok_or(PricingError::Underflow {
            operation: "first liquidity offset",
        })
}

// =============================================================================
// SWAP
// =============================================================================

/// Output units for swapping `in_amt` into the pool
///
/// ```text
/// factor = scale - fee_bps
/// out = (in_amt * factor * out_sup) / (in_sup * scale + in_amt * factor)
/// ```
///
/// Constant product with the fee taken from the input side. The product of
/// reserves strictly grows across every swap with a non-zero fee.
pub fn swap_tokens(
    in_amt: Amount,
    in_sup: Amount,
    out_sup: Amount,
    fees: &FeeSchedule,
) -> PricingResult<Amount> {
    if in_sup == 0 {
        return Err(PricingError::EmptyReserve { operand: "in_sup" });
    }
    if out_sup == 0 {
        return Err(PricingError::EmptyReserve { operand: "out_sup" });
    }

    let factor = fees.factor()?;
    let overflow = PricingError::Overflow { operation: "swap" };

    let effective_in = in_amt.checked_mul(factor).ok_or(overflow)?;
    let numerator = effective_in.checked_mul(out_sup).ok_or(overflow)?;
    let denominator = in_sup
        .checked_mul(fees.scale)
        .and_then(|scaled| scaled.checked_add(effective_in))
        .ok_or(overflow)?;

    numerator
        .checked_div(denominator)
        .ok_or(PricingError::DivisionByZero {
            operand: "swap denominator",
        })
}
