//! Slippage tolerance: a percentage string normalized to at most one
//! fractional digit and clamped to [0, 100]. The empty string is a valid
//! "unset" sentinel distinct from zero.

use bigdecimal::{BigDecimal, RoundingMode};
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_SLIPPAGE: &str = "5";

/// Normalized slippage tolerance. Construct via [`Slippage::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slippage(String);

impl Slippage {
    /// Unset sentinel. Distinct from `Slippage::parse("0")`.
    pub fn unset() -> Self {
        Self(String::new())
    }

    /// Normalizes raw input: non-numeric input becomes unset, the value is
    /// clamped to [0, 100] and rounded down to one fractional digit.
    /// Idempotent: `parse(parse(s)) == parse(s)`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::unset();
        }
        let value = match BigDecimal::from_str(trimmed) {
            Ok(v) => v,
            Err(_) => return Self::unset(),
        };
        let clamped = value
            .max(BigDecimal::zero())
            .min(BigDecimal::from(100));
        let normalized = clamped.with_scale_round(1, RoundingMode::Down);
        let rendered = normalized.to_string();
        let rendered = rendered
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string();
        if rendered.is_empty() {
            Self("0".to_string())
        } else {
            Self(rendered)
        }
    }

    pub fn is_unset(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The tolerance as a fraction (e.g. `"5"` -> `0.05`). Unset reads as
    /// zero for computation purposes.
    pub fn fraction(&self) -> BigDecimal {
        if self.0.is_empty() {
            return BigDecimal::zero();
        }
        // parse() guarantees the stored string is numeric
        let pct = BigDecimal::from_str(&self.0).unwrap_or_else(|_| BigDecimal::zero());
        pct / BigDecimal::from(100)
    }
}

impl Default for Slippage {
    fn default() -> Self {
        Self::parse(DEFAULT_SLIPPAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clamps_range() {
        assert_eq!(Slippage::parse("150").as_str(), "100");
        assert_eq!(Slippage::parse("-3").as_str(), "0");
    }

    #[test]
    fn test_parse_limits_fraction_digits() {
        assert_eq!(Slippage::parse("0.55").as_str(), "0.5");
        assert_eq!(Slippage::parse("12.99").as_str(), "12.9");
    }

    #[test]
    fn test_parse_idempotent() {
        for raw in ["0", "0.55", "150", "-3", "", "abc", "12.3"] {
            let once = Slippage::parse(raw);
            let twice = Slippage::parse(once.as_str());
            assert_eq!(once, twice, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_unset_distinct_from_zero() {
        assert!(Slippage::parse("").is_unset());
        assert!(!Slippage::parse("0").is_unset());
        assert_ne!(Slippage::unset(), Slippage::parse("0"));
    }

    #[test]
    fn test_fraction() {
        assert_eq!(Slippage::parse("5").fraction(), BigDecimal::from(5) / BigDecimal::from(100));
        assert_eq!(Slippage::unset().fraction(), BigDecimal::from(0));
    }
}
