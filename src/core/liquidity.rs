//! Liquidity engine: proportional deposit/withdraw math, pool-share
//! estimates and the client-side withdrawal sufficiency check that mirrors
//! the DEX pallet's own remove-liquidity guard.
//!
//! Ratio math runs on display-unit decimals; the sufficiency check runs on
//! base-unit integers with the pallet's exact integer division.

use crate::error::{DexError, Result, Severity};
use bigdecimal::num_bigint::BigUint;
use bigdecimal::BigDecimal;
use num_traits::{ToPrimitive, Zero};
use thiserror::Error;

/// Result of a proportional-deposit computation.
#[derive(Debug, Clone, PartialEq)]
pub struct AddQuote {
    /// The other side's amount at the pool ratio.
    pub converted_other: BigDecimal,
    /// Estimated pool share after the deposit, percent.
    pub est_pool_share: BigDecimal,
}

/// Proportional deposit: entering `amount` on a side whose reserve is
/// `liquidity_side` requires `amount * liquidity_other / liquidity_side`
/// of the other side, and buys `amount / (liquidity_side + amount)` of the
/// grown pool.
pub fn quote_add(
    amount: &BigDecimal,
    liquidity_side: &BigDecimal,
    liquidity_other: &BigDecimal,
) -> Result<AddQuote> {
    if liquidity_side.is_zero() {
        return Err(DexError::Validation(
            "pool has no liquidity on the entered side".to_string(),
        ));
    }
    let converted_other = amount * liquidity_other / liquidity_side;
    let est_pool_share = amount / (liquidity_side + amount) * BigDecimal::from(100);
    Ok(AddQuote {
        converted_other,
        est_pool_share,
    })
}

/// Result of a first-deposit computation. Unlike [`AddQuote`] there is no
/// converted amount: with no reserves, both sides are user-entered and only
/// their ratio is derived.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateQuote {
    /// `y / x` of the entered amounts; becomes the pool's opening price.
    pub ratio: BigDecimal,
    /// Always 100: the first depositor owns the whole pool.
    pub est_pool_share: BigDecimal,
}

/// First deposit into a pool with no reserves.
pub fn quote_create(x_amount: &BigDecimal, y_amount: &BigDecimal) -> Result<CreateQuote> {
    if x_amount.is_zero() {
        return Err(DexError::Validation("x amount must be positive".to_string()));
    }
    Ok(CreateQuote {
        ratio: y_amount / x_amount,
        est_pool_share: BigDecimal::from(100),
    })
}

/// Result of a proportional-withdrawal computation.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveQuote {
    /// The requested amount, clamped to the holder's pool-derived balance.
    pub amount: BigDecimal,
    pub converted_other: BigDecimal,
    /// Estimated share of the shrunken pool, percent.
    pub est_pool_share: BigDecimal,
    /// Requested amount as a percentage of the holder's position.
    pub percentage: BigDecimal,
}

/// Proportional withdrawal. A request above the holder's balance is clamped
/// to it and the percentage forced to 100 rather than erroring. The share
/// estimate flips sign versus deposit because reserves shrink.
pub fn quote_remove(
    requested: &BigDecimal,
    holder_balance: &BigDecimal,
    liquidity_side: &BigDecimal,
    liquidity_other: &BigDecimal,
) -> Result<RemoveQuote> {
    if liquidity_side.is_zero() || holder_balance.is_zero() {
        return Err(DexError::Validation(
            "no position to withdraw from".to_string(),
        ));
    }
    let (amount, percentage) = if requested > holder_balance {
        (holder_balance.clone(), BigDecimal::from(100))
    } else {
        (
            requested.clone(),
            requested / holder_balance * BigDecimal::from(100),
        )
    };
    let converted_other = &amount * liquidity_other / liquidity_side;
    let remaining = liquidity_side - &amount;
    let est_pool_share = if remaining.is_zero() {
        BigDecimal::from(100)
    } else {
        &amount / remaining * BigDecimal::from(100)
    };
    Ok(RemoveQuote {
        amount,
        converted_other,
        est_pool_share,
        percentage,
    })
}

/// Inverse of the percentage readout: the 25/50/75/100% buttons.
pub fn amount_for_percent(holder_balance: &BigDecimal, percent: u8) -> BigDecimal {
    holder_balance * BigDecimal::from(u32::from(percent.min(100))) / BigDecimal::from(100)
}

/// Withdrawal-invariant violations, mirroring the pallet's guards.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WithdrawalError {
    #[error("Invalid input: liquidity to burn and total supply must be positive")]
    InvalidInput,

    #[error("Insufficient liquidity burnt: withdrawal too small to pay out")]
    InsufficientLiquidityBurnt,

    #[error("Withdrawn amount on side {side} is below the requested minimum")]
    BelowMinimum { side: char },
}

impl WithdrawalError {
    /// `Error` blocks submission; `Warning` is advisory.
    pub fn severity(&self) -> Severity {
        match self {
            WithdrawalError::InvalidInput | WithdrawalError::InsufficientLiquidityBurnt => {
                Severity::Error
            }
            WithdrawalError::BelowMinimum { .. } => Severity::Warning,
        }
    }

    pub fn remedy(&self) -> Option<&'static str> {
        match self {
            WithdrawalError::BelowMinimum { .. } => {
                Some("Try increasing your slippage tolerance")
            }
            _ => None,
        }
    }
}

impl From<WithdrawalError> for DexError {
    fn from(err: WithdrawalError) -> Self {
        DexError::Withdrawal(err.to_string())
    }
}

/// Client-side copy of the pallet's remove-liquidity guard, run before
/// submission to fail fast. Integer math only:
/// `amount = liquidity * reserve / total_supply`, truncating.
pub fn check_withdrawal(
    liquidity: u128,
    reserve_a: u128,
    reserve_b: u128,
    total_supply: u128,
    min_a: u128,
    min_b: u128,
) -> std::result::Result<(u128, u128), WithdrawalError> {
    if liquidity == 0 || total_supply == 0 {
        return Err(WithdrawalError::InvalidInput);
    }
    // widen before multiplying; liquidity * reserve can exceed u128
    let payout = |reserve: u128| -> u128 {
        let wide = BigUint::from(liquidity) * BigUint::from(reserve) / BigUint::from(total_supply);
        // quotient <= reserve, so the narrowing cannot fail
        wide.to_u128().unwrap_or(u128::MAX)
    };
    let amount_a = payout(reserve_a);
    let amount_b = payout(reserve_b);
    if amount_a == 0 || amount_b == 0 {
        return Err(WithdrawalError::InsufficientLiquidityBurnt);
    }
    if amount_a < min_a {
        return Err(WithdrawalError::BelowMinimum { side: 'a' });
    }
    if amount_b < min_b {
        return Err(WithdrawalError::BelowMinimum { side: 'b' });
    }
    Ok((amount_a, amount_b))
}
