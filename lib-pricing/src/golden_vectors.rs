//! Golden Vector Tests for the Pricing Model
//!
//! These tests lock the exact integer outputs of every formula.
//! If any of these tests fail, it indicates a breaking change to pool pricing.
//!
//! DO NOT modify expected values without explicit approval and a migration plan.

use crate::model::*;

// =============================================================================
// GOLDEN VECTOR: First funding of a 1000 / 3000 pool
// =============================================================================

#[test]
fn golden_first_liquidity_1000_3000() {
    let fees = FeeSchedule::default();

    // isqrt(3_000_000) = 1732, minus scale 1000
    let seeded = first_liquidity(1_000, 3_000, &fees).unwrap();

    // GOLDEN VECTOR: This exact value MUST NOT change
    assert_eq!(seeded, 732, "GOLDEN VECTOR BROKEN: first liquidity changed!");
}

// =============================================================================
// GOLDEN VECTOR: Lopsided deposit mints nothing
// =============================================================================

#[test]
fn golden_mint_lopsided_deposit() {
    // b ratio 1000 / 3000 truncates to zero and caps the mint
    let minted = mint_tokens(732, 1_000, 3_000, 100_000, 1_000).unwrap();

    // GOLDEN VECTOR: This exact value MUST NOT change
    assert_eq!(minted, 0, "GOLDEN VECTOR BROKEN: lopsided mint changed!");
}

#[test]
fn golden_mint_proportional_deposit() {
    let minted = mint_tokens(732, 1_000, 3_000, 2_000, 6_000).unwrap();

    // GOLDEN VECTOR: This exact value MUST NOT change
    assert_eq!(minted, 1_464, "GOLDEN VECTOR BROKEN: proportional mint changed!");
}

// =============================================================================
// GOLDEN VECTOR: Small swap
// =============================================================================

#[test]
fn golden_swap_5_into_1000_3000() {
    let fees = FeeSchedule::default();

    // (5 * 995 * 3000) / (1000 * 1000 + 5 * 995) = 14_925_000 / 1_004_975
    let out = swap_tokens(5, 1_000, 3_000, &fees).unwrap();

    // GOLDEN VECTOR: This exact value MUST NOT change
    assert_eq!(out, 14, "GOLDEN VECTOR BROKEN: swap output changed!");
}

#[test]
fn golden_swap_reverse_direction() {
    let fees = FeeSchedule::default();

    // (300 * 995 * 1000) / (3000 * 1000 + 300 * 995) = 298_500_000 / 3_298_500
    let out = swap_tokens(300, 3_000, 1_000, &fees).unwrap();

    // GOLDEN VECTOR: This exact value MUST NOT change
    assert_eq!(out, 90, "GOLDEN VECTOR BROKEN: reverse swap output changed!");
}

// =============================================================================
// GOLDEN VECTOR: Burn
// =============================================================================

#[test]
fn golden_burn_full_supply() {
    assert_eq!(burn_tokens(732, 1_000, 732).unwrap(), 1_000);
    assert_eq!(burn_tokens(732, 3_000, 732).unwrap(), 3_000);
}

#[test]
fn golden_burn_partial_truncates_to_zero() {
    // 366 / 732 truncates to zero before scaling by the reserve
    assert_eq!(burn_tokens(732, 1_000, 366).unwrap(), 0);
}

// =============================================================================
// DETERMINISM TESTS
// =============================================================================

#[test]
fn test_formulas_are_deterministic() {
    let fees = FeeSchedule::default();
    for _ in 0..100 {
        assert_eq!(swap_tokens(5, 1_000, 3_000, &fees).unwrap(), 14);
        assert_eq!(first_liquidity(1_000, 3_000, &fees).unwrap(), 732);
    }
}
