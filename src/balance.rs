//! Fixed-point balance type: an arbitrary-precision decimal bound to a
//! token, with the base-unit / display-unit distinction carried in the type
//! system instead of a runtime flag.
//!
//! # Invariants
//! - Arithmetic returns a new `Balance` carrying the same token and the same
//!   unit; it never silently converts between units.
//! - `to_planck` always produces an integer value (rounded toward zero).
//! - `to_unit` followed by `to_planck` round-trips exactly for values that
//!   fit the token's decimal places.
//! - Comparisons compare numeric value only; callers must convert both sides
//!   to the same unit first. The type parameter enforces this.

use crate::asset::Token;
use crate::error::{DexError, Result};
use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal, RoundingMode};
use num_traits::{One, Zero};
use std::cmp::Ordering;
use std::marker::PhantomData;
use std::str::FromStr;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Planck {}
    impl Sealed for super::Human {}
}

/// Marker for the unit a balance is denominated in.
pub trait Unit: sealed::Sealed + Copy + std::fmt::Debug {}

/// Base units ("planck" on the substrate chain, "drops" on the ledger).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Planck;
impl Unit for Planck {}

/// Display units (base units scaled down by the token's decimals).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Human;
impl Unit for Human {}

/// 10^d as an exact decimal.
pub(crate) fn pow10(d: u8) -> BigDecimal {
    BigDecimal::new(BigInt::one(), -i64::from(d))
}

/// Exact conversion from a base-unit integer. `From<u128>` goes through
/// `BigInt` so no precision is lost on large supplies.
pub(crate) fn big_decimal(v: u128) -> BigDecimal {
    BigDecimal::from(BigInt::from(v))
}

/// An arbitrary-precision decimal quantity of a specific token, denominated
/// in the unit named by `U`.
#[derive(Debug, Clone)]
pub struct Balance<U: Unit> {
    value: BigDecimal,
    token: Token,
    _unit: PhantomData<U>,
}

impl<U: Unit> Balance<U> {
    pub fn value(&self) -> &BigDecimal {
        &self.value
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.value > BigDecimal::zero()
    }

    /// Sum with another balance in the same unit. The token association of
    /// `self` is preserved.
    pub fn plus(&self, other: &Balance<U>) -> Balance<U> {
        self.with_value(&self.value + &other.value)
    }

    pub fn minus(&self, other: &Balance<U>) -> Balance<U> {
        self.with_value(&self.value - &other.value)
    }

    pub fn multiplied_by(&self, factor: &BigDecimal) -> Balance<U> {
        self.with_value(&self.value * factor)
    }

    pub fn divided_by(&self, divisor: &BigDecimal) -> Result<Balance<U>> {
        if divisor.is_zero() {
            return Err(DexError::Validation("division by zero".to_string()));
        }
        Ok(self.with_value(&self.value / divisor))
    }

    /// Integer part (rounded toward zero), same unit and token.
    pub fn integer_value(&self) -> Balance<U> {
        self.with_value(self.value.with_scale_round(0, RoundingMode::Down))
    }

    fn with_value(&self, value: BigDecimal) -> Balance<U> {
        Balance {
            value,
            token: self.token.clone(),
            _unit: PhantomData,
        }
    }
}

impl Balance<Planck> {
    /// Constructs a base-unit balance from any decimal value. No binary
    /// float intermediate is involved.
    pub fn new(value: BigDecimal, token: Token) -> Self {
        Self {
            value,
            token,
            _unit: PhantomData,
        }
    }

    pub fn from_planck(value: u128, token: Token) -> Self {
        Self::new(big_decimal(value), token)
    }

    /// Parses a plain decimal string (integer or fractional, no grouping).
    pub fn parse(raw: &str, token: Token) -> Result<Self> {
        let value = BigDecimal::from_str(raw)
            .map_err(|e| DexError::Validation(format!("invalid amount {raw:?}: {e}")))?;
        Ok(Self::new(value, token))
    }

    /// Converts to display units by dividing by 10^decimals.
    pub fn to_unit(&self) -> Balance<Human> {
        Balance {
            value: &self.value / pow10(self.token.decimals()),
            token: self.token.clone(),
            _unit: PhantomData,
        }
    }

    /// Plain (non-grouped) integer string suitable for wire encoding.
    pub fn to_planck_string(&self) -> String {
        self.value
            .with_scale_round(0, RoundingMode::Down)
            .to_plain_string()
    }
}

impl Balance<Human> {
    pub fn new(value: BigDecimal, token: Token) -> Self {
        Self {
            value,
            token,
            _unit: PhantomData,
        }
    }

    pub fn parse(raw: &str, token: Token) -> Result<Self> {
        let value = BigDecimal::from_str(raw)
            .map_err(|e| DexError::Validation(format!("invalid amount {raw:?}: {e}")))?;
        Ok(Self::new(value, token))
    }

    /// Converts to base units. The result is always integer-valued: any
    /// fraction finer than the token's decimals is truncated.
    pub fn to_planck(&self) -> Balance<Planck> {
        let scaled = &self.value * pow10(self.token.decimals());
        Balance {
            value: scaled.with_scale_round(0, RoundingMode::Down),
            token: self.token.clone(),
            _unit: PhantomData,
        }
    }

    /// Fixed-decimals rendering with trailing zeros trimmed; the integer
    /// part is always preserved (`"3.000"` -> `"3"`). Always plain
    /// notation, never scientific, so the output stays wire- and
    /// input-grammar-safe at any magnitude.
    pub fn to_human(&self) -> String {
        let scaled = self
            .value
            .with_scale_round(i64::from(self.token.decimals()), RoundingMode::Down);
        let rendered = scaled.to_plain_string();
        if rendered.contains('.') {
            rendered
                .trim_end_matches('0')
                .trim_end_matches('.')
                .to_string()
        } else {
            rendered
        }
    }
}

impl<U: Unit> PartialEq for Balance<U> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<U: Unit> PartialOrd for Balance<U> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::ChainToken;

    fn token(decimals: u8) -> Token {
        Token::Chain(ChainToken {
            asset_id: 1,
            symbol: "ROOT".to_string(),
            name: "Root".to_string(),
            decimals,
            supply: 0,
            price_in_usd: None,
        })
    }

    #[test]
    fn test_to_unit_divides_by_decimals() {
        let b = Balance::<Planck>::from_planck(1_500_000, token(6));
        assert_eq!(b.to_unit().to_human(), "1.5");
    }

    #[test]
    fn test_roundtrip_idempotence() {
        let b = Balance::<Planck>::from_planck(123_456_789, token(6));
        let roundtripped = b.to_unit().to_planck();
        assert_eq!(roundtripped.value(), b.value());
    }

    #[test]
    fn test_to_planck_is_integer() {
        let b = Balance::<Human>::parse("1.2345678", token(6)).unwrap();
        let p = b.to_planck();
        assert_eq!(p.to_planck_string(), "1234567");
    }

    #[test]
    fn test_to_planck_string_is_plain() {
        let t = token(18);
        let b = Balance::<Human>::parse("3", t).unwrap().to_planck();
        assert_eq!(b.to_planck_string(), "3000000000000000000");
    }

    #[test]
    fn test_to_human_trims_trailing_zeros() {
        let t = token(6);
        assert_eq!(
            Balance::<Human>::parse("3.000", t.clone()).unwrap().to_human(),
            "3"
        );
        assert_eq!(
            Balance::<Human>::parse("0.5000", t).unwrap().to_human(),
            "0.5"
        );
    }

    #[test]
    fn test_to_human_small_values_stay_plain() {
        // 1 base unit at 18 decimals must not render scientific
        let b = Balance::<Planck>::from_planck(1, token(18));
        assert_eq!(b.to_unit().to_human(), "0.000000000000000001");

        let b = Balance::<Planck>::from_planck(1, token(6));
        assert_eq!(b.to_unit().to_human(), "0.000001");
    }

    #[test]
    fn test_arithmetic_preserves_token_and_unit() {
        let t = token(6);
        let a = Balance::<Planck>::from_planck(100, t.clone());
        let b = Balance::<Planck>::from_planck(50, t.clone());
        let sum = a.plus(&b);
        assert_eq!(sum.value(), &big_decimal(150));
        assert_eq!(sum.token(), &t);
        assert_eq!(a.minus(&b).value(), &big_decimal(50));
    }

    #[test]
    fn test_division_by_zero_is_error() {
        let a = Balance::<Planck>::from_planck(100, token(6));
        assert!(a.divided_by(&BigDecimal::zero()).is_err());
    }

    #[test]
    fn test_zero_decimals_is_valid() {
        let t = token(0);
        let b = Balance::<Planck>::from_planck(42, t);
        assert_eq!(b.to_unit().to_human(), "42");
    }

    #[test]
    fn test_no_precision_loss_on_large_values() {
        let t = token(18);
        let b = Balance::<Planck>::from_planck(u128::MAX, t);
        assert_eq!(b.to_planck_string(), u128::MAX.to_string());
    }
}
