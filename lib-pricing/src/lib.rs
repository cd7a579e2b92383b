//! Pool Pricing Library
//!
//! Pure integer formulas for a two-asset constant-product pool.
//!
//! # Formulas
//!
//! - **Mint**: `min(a_amt / a_sup, b_amt / b_sup) * issued`
//! - **Burn**: `reserve_sup * (burn_amt / issued)`
//! - **Swap**: `(in * f * out_sup) / (in_sup * scale + in * f)` where `f = scale - fee_bps`
//! - **First liquidity**: `isqrt(a_amt * b_amt) - scale`
//!
//! # Invariants
//!
//! - All math is u64 with floor division
//! - Overflow and division by zero are errors, never silent zeros
//! - Functions are pure: same inputs always give the same output

pub mod errors;
pub mod math;
pub mod model;

#[cfg(test)]
mod golden_vectors;

pub use errors::{PricingError, PricingResult};
pub use math::integer_sqrt;
pub use model::{
    burn_tokens, first_liquidity, mint_tokens, swap_tokens, FeeSchedule, DEFAULT_FEE_BPS,
    DEFAULT_SCALE,
};
