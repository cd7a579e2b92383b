//! Pricing Errors

use thiserror::Error;

/// Arithmetic failure inside a pricing formula
///
/// Every variant is fatal to the invocation that triggered it. No formula
/// ever substitutes zero or a saturated value for a failed operation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingError {
    #[error("Division by zero: {operand} is zero")]
    DivisionByZero { operand: &'static str },

    #[error("Swap against empty reserve: {operand} is zero")]
    EmptyReserve { operand: &'static str },

    #[error("Arithmetic overflow in {operation}")]
    Overflow { operation: &'static str },

    #[error("Arithmetic underflow in {operation}")]
    Underflow { operation: &'static str },

    #[error("Invalid fee schedule: fee_bps={fee_bps}, scale={scale}")]
    InvalidFeeSchedule { fee_bps: u64, scale: u64 },
}

/// Result type for pricing operations
pub type PricingResult<T> = Result<T, PricingError>;
