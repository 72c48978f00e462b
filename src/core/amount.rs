//! Per-side amount-input controller. Holds the raw string the user typed,
//! clamps it to the token's decimal places, and re-validates it against the
//! available balance — synchronously, and again whenever the balance moves
//! under the field (price refresh, new block).

use crate::asset::Token;
use crate::balance::{Balance, Human};
use crate::error::Result;
use bigdecimal::BigDecimal;
use num_traits::Zero;
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

pub const INSUFFICIENT_BALANCE: &str = "Insufficient balance";

// Digits, optionally one decimal point, optionally more digits. Fractional
// length is checked separately against the token's decimals.
static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d*(?:\.\d*)?$").expect("static pattern"));

/// State of one side (x or y) of a pair entry form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AmountInput {
    token: Option<Token>,
    amount: String,
    error: Option<String>,
}

impl AmountInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Selecting a different token invalidates whatever was typed for the
    /// previous one.
    pub fn set_token(&mut self, token: Option<Token>) {
        if self.token != token {
            self.token = token;
            self.amount.clear();
            self.error = None;
        }
    }

    /// Applies a raw edit. A lone `"."` normalizes to `"0."`; input that is
    /// not numeric, or carries more fractional digits than the token's
    /// decimals, is rejected and the previous state kept. Returns whether
    /// the edit was accepted.
    pub fn set_amount(&mut self, raw: &str, available: Option<&Balance<Human>>) -> bool {
        let candidate = if raw == "." { "0." } else { raw };
        if !AMOUNT_RE.is_match(candidate) {
            return false;
        }
        if let Some(decimals) = self.token.as_ref().map(Token::decimals) {
            if let Some(fraction) = candidate.split_once('.').map(|(_, f)| f) {
                if fraction.len() > usize::from(decimals) {
                    return false;
                }
            }
        }
        self.amount = candidate.to_string();
        self.revalidate(available);
        true
    }

    /// Re-runs balance validation without changing the amount. Call when the
    /// available balance changes out from under the field.
    pub fn revalidate(&mut self, available: Option<&Balance<Human>>) {
        self.error = None;
        let Some(value) = self.value() else {
            return;
        };
        if let Some(available) = available {
            if &value > available.value() {
                self.error = Some(INSUFFICIENT_BALANCE.to_string());
            }
        }
    }

    /// The entered amount as a decimal, if non-empty and parseable.
    pub fn value(&self) -> Option<BigDecimal> {
        if self.amount.is_empty() || self.amount == "0." {
            return None;
        }
        BigDecimal::from_str(&self.amount).ok()
    }

    /// The entered amount as a display-unit balance of the selected token.
    pub fn balance(&self) -> Result<Option<Balance<Human>>> {
        let (Some(token), Some(value)) = (self.token.clone(), self.value()) else {
            return Ok(None);
        };
        Ok(Some(Balance::<Human>::new(value, token)))
    }

    /// Non-empty, valid, strictly positive and within balance.
    pub fn is_ready(&self) -> bool {
        self.error.is_none()
            && self
                .value()
                .map(|v| v > BigDecimal::zero())
                .unwrap_or(false)
    }

    /// Replaces the amount programmatically (dependent-side computation,
    /// percent buttons). Still validated against the balance.
    pub fn set_computed(&mut self, value: &BigDecimal, available: Option<&Balance<Human>>) {
        let decimals = self.token.as_ref().map(Token::decimals).unwrap_or(6);
        // plain notation: scientific would not survive AMOUNT_RE on re-edit
        let scaled = value.with_scale_round(i64::from(decimals), bigdecimal::RoundingMode::Down);
        let rendered = scaled.to_plain_string();
        self.amount = if rendered.contains('.') {
            rendered
                .trim_end_matches('0')
                .trim_end_matches('.')
                .to_string()
        } else {
            rendered
        };
        self.revalidate(available);
    }

    pub fn clear(&mut self) {
        self.amount.clear();
        self.error = None;
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

    fn human(raw: &str, decimals: u8) -> Balance<Human> {
        Balance::<Human>::parse(raw, token(decimals)).unwrap()
    }

    #[test]
    fn test_lone_dot_normalizes() {
        let mut input = AmountInput::new();
        input.set_token(Some(token(6)));
        assert!(input.set_amount(".", None));
        assert_eq!(input.amount(), "0.");
        assert!(input.value().is_none());
    }

    #[test]
    fn test_rejects_excess_fraction_digits() {
        let mut input = AmountInput::new();
        input.set_token(Some(token(2)));
        assert!(input.set_amount("1.25", None));
        assert!(!input.set_amount("1.256", None));
        assert_eq!(input.amount(), "1.25");
    }

    #[test]
    fn test_rejects_non_numeric() {
        let mut input = AmountInput::new();
        input.set_token(Some(token(6)));
        assert!(!input.set_amount("1a", None));
        assert!(!input.set_amount("1.2.3", None));
        assert!(!input.set_amount("-1", None));
    }

    #[test]
    fn test_insufficient_balance_error() {
        let mut input = AmountInput::new();
        input.set_token(Some(token(6)));
        let available = human("5", 6);
        assert!(input.set_amount("6", Some(&available)));
        assert_eq!(input.error(), Some(INSUFFICIENT_BALANCE));
        assert!(!input.is_ready());

        assert!(input.set_amount("4", Some(&available)));
        assert!(input.error().is_none());
        assert!(input.is_ready());
    }

    #[test]
    fn test_revalidate_on_balance_change() {
        let mut input = AmountInput::new();
        input.set_token(Some(token(6)));
        assert!(input.set_amount("4", Some(&human("5", 6))));
        assert!(input.error().is_none());

        // balance dropped while the field was focused
        input.revalidate(Some(&human("3", 6)));
        assert_eq!(input.error(), Some(INSUFFICIENT_BALANCE));
    }

    #[test]
    fn test_set_token_clears_amount() {
        let mut input = AmountInput::new();
        input.set_token(Some(token(6)));
        assert!(input.set_amount("4", None));
        input.set_token(Some(token(2)));
        assert_eq!(input.amount(), "");
    }

    #[test]
    fn test_set_computed_small_value_stays_editable() {
        let mut input = AmountInput::new();
        input.set_token(Some(token(18)));
        let tiny = BigDecimal::from_str("0.000000000000000001").unwrap();
        input.set_computed(&tiny, None);
        assert_eq!(input.amount(), "0.000000000000000001");

        // the stored string must round-trip through a user re-edit
        let stored = input.amount().to_string();
        assert!(input.set_amount(&stored, None));
        assert_eq!(input.value(), Some(tiny));
    }

    #[test]
    fn test_set_computed_trims_to_decimals() {
        let mut input = AmountInput::new();
        input.set_token(Some(token(2)));
        let value = BigDecimal::from_str("1.23999").unwrap();
        input.set_computed(&value, None);
        assert_eq!(input.amount(), "1.23");
    }
}
