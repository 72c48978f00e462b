//! Token model for the two supported networks. A token is either a
//! substrate-chain fungible asset (integer id) or an XRPL currency
//! (3-letter or hex-40 code with an optional issuer). Discrimination is an
//! explicit tag, never a structural guess.

use crate::error::{DexError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimal places assumed for XRPL currencies that do not supply their own.
/// XRP itself always uses 6 (drops).
pub const DEFAULT_LEDGER_DECIMALS: u8 = 6;

/// An XRPL currency code: either a standard 3-character code or a raw
/// 40-hex-char code. Stored normalized so that pool-key lookups and
/// trustline matches never miss on case or encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parses and normalizes a currency code.
    ///
    /// - 3 ASCII alphanumeric chars are uppercased (`"usd"` -> `"USD"`).
    /// - 40 hex chars are uppercased as-is.
    /// - Anything longer than 3 chars (and not hex-40) is encoded the XRPL
    ///   way: ASCII bytes hex-encoded, zero-padded to 40 chars.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(DexError::Validation("empty currency code".to_string()));
        }
        if raw.len() == 3 && raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Ok(Self(raw.to_ascii_uppercase()));
        }
        if raw.len() == 40 && raw.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(Self(raw.to_ascii_uppercase()));
        }
        if raw.len() > 3 && raw.len() <= 20 && raw.is_ascii() {
            let mut encoded = hex::encode_upper(raw.as_bytes());
            while encoded.len() < 40 {
                encoded.push('0');
            }
            return Ok(Self(encoded));
        }
        Err(DexError::Validation(format!(
            "invalid currency code: {raw}"
        )))
    }

    /// The normalized code as stored (3-char or hex-40).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_hex(&self) -> bool {
        self.0.len() == 40
    }

    /// Human-readable form: hex-40 codes whose bytes are printable ASCII
    /// (ignoring trailing zero padding) are decoded back to text, else the
    /// raw code is returned.
    pub fn display_code(&self) -> String {
        if !self.is_hex() {
            return self.0.clone();
        }
        if let Ok(bytes) = hex::decode(&self.0) {
            let trimmed: Vec<u8> = bytes.into_iter().take_while(|b| *b != 0).collect();
            if !trimmed.is_empty() && trimmed.iter().all(|b| b.is_ascii_graphic()) {
                if let Ok(text) = String::from_utf8(trimmed) {
                    return text;
                }
            }
        }
        self.0.clone()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_code())
    }
}

/// A fungible asset on the substrate chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainToken {
    pub asset_id: u32,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    /// Total issued supply, in base units.
    pub supply: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_in_usd: Option<f64>,
}

/// A currency on the XRP Ledger. `issuer` is absent only for the native
/// asset (XRP).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerCurrency {
    pub currency: CurrencyCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
    /// Human-friendly alias for display and price-feed lookup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_in_usd: Option<f64>,
}

impl LedgerCurrency {
    /// The native ledger asset (XRP), 6 decimals, no issuer.
    pub fn xrp() -> Self {
        Self {
            currency: CurrencyCode("XRP".to_string()),
            issuer: None,
            decimals: Some(DEFAULT_LEDGER_DECIMALS),
            ticker: Some("XRP".to_string()),
            price_in_usd: None,
        }
    }

    pub fn is_native(&self) -> bool {
        self.issuer.is_none() && self.currency.as_str() == "XRP"
    }
}

/// Token capability used throughout the engine. Exactly one variant is
/// active per value; all engine functions branch on the tag explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Token {
    Chain(ChainToken),
    Ledger(LedgerCurrency),
}

impl Token {
    /// Decimal places of the asset. Ledger currencies without explicit
    /// decimals are assumed to use the ledger default.
    pub fn decimals(&self) -> u8 {
        match self {
            Token::Chain(t) => t.decimals,
            Token::Ledger(c) => c.decimals.unwrap_or(DEFAULT_LEDGER_DECIMALS),
        }
    }

    /// The symbol shown to the user and used for price-feed lookup.
    pub fn symbol(&self) -> String {
        match self {
            Token::Chain(t) => t.symbol.clone(),
            Token::Ledger(c) => c
                .ticker
                .clone()
                .unwrap_or_else(|| c.currency.display_code()),
        }
    }

    /// The component this token contributes to a pool storage key:
    /// numeric id for chain assets, normalized currency code for ledger
    /// currencies. Pool lookups compare against this.
    pub fn pool_component(&self) -> String {
        match self {
            Token::Chain(t) => t.asset_id.to_string(),
            Token::Ledger(c) => c.currency.as_str().to_string(),
        }
    }

    pub fn price_in_usd(&self) -> Option<f64> {
        match self {
            Token::Chain(t) => t.price_in_usd,
            Token::Ledger(c) => c.price_in_usd,
        }
    }

    pub fn is_chain(&self) -> bool {
        matches!(self, Token::Chain(_))
    }

    pub fn is_ledger(&self) -> bool {
        matches!(self, Token::Ledger(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_token(id: u32, symbol: &str, decimals: u8) -> Token {
        Token::Chain(ChainToken {
            asset_id: id,
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            decimals,
            supply: 1_000_000,
            price_in_usd: None,
        })
    }

    #[test]
    fn test_currency_code_three_letter_uppercased() {
        let code = CurrencyCode::parse("usd").unwrap();
        assert_eq!(code.as_str(), "USD");
        assert!(!code.is_hex());
    }

    #[test]
    fn test_currency_code_hex40_roundtrip() {
        let raw = "534f4c4f00000000000000000000000000000000"; // "SOLO" padded
        let code = CurrencyCode::parse(raw).unwrap();
        assert!(code.is_hex());
        assert_eq!(code.display_code(), "SOLO");
    }

    #[test]
    fn test_currency_code_long_ascii_encodes_to_hex40() {
        let code = CurrencyCode::parse("SOLO").unwrap();
        assert_eq!(code.as_str().len(), 40);
        assert_eq!(code.display_code(), "SOLO");
    }

    #[test]
    fn test_currency_code_rejects_garbage() {
        assert!(CurrencyCode::parse("").is_err());
        assert!(CurrencyCode::parse("a!").is_err());
    }

    #[test]
    fn test_token_decimals_defaults() {
        let xrp = Token::Ledger(LedgerCurrency::xrp());
        assert_eq!(xrp.decimals(), 6);

        let issued = Token::Ledger(LedgerCurrency {
            currency: CurrencyCode::parse("USD").unwrap(),
            issuer: Some("rIssuer".to_string()),
            decimals: None,
            ticker: None,
            price_in_usd: None,
        });
        assert_eq!(issued.decimals(), DEFAULT_LEDGER_DECIMALS);
    }

    #[test]
    fn test_pool_component_by_variant() {
        assert_eq!(chain_token(2, "XRP", 6).pool_component(), "2");
        let usd = Token::Ledger(LedgerCurrency {
            currency: CurrencyCode::parse("usd").unwrap(),
            issuer: Some("rIssuer".to_string()),
            decimals: None,
            ticker: None,
            price_in_usd: None,
        });
        assert_eq!(usd.pool_component(), "USD");
    }
}
