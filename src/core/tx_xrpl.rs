//! XRPL transaction building: Payment, AMMDeposit, AMMWithdraw, TrustSet and
//! the cross-currency payment used for swaps. The ledger has no swap
//! instruction; a partial-payment with `SendMax` (source ceiling) and
//! `DeliverMin` (destination floor) executes the trade atomically through
//! the AMM's paths.

use crate::asset::{LedgerCurrency, Token};
use crate::balance::{Balance, Human};
use crate::core::services::LedgerBalance;
use crate::error::{DexError, Result};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

pub const XRPL_EXPLORER_URL: &str = "https://livenet.xrpl.org/transactions";

/// tfPartialPayment: deliver what the paths allow, bounded by DeliverMin.
pub const TF_PARTIAL_PAYMENT: u32 = 0x0002_0000;
/// tfTwoAsset: proportional two-asset AMM deposit/withdrawal.
pub const TF_TWO_ASSET: u32 = 0x0010_0000;

/// Default trustline limit when the user has not set one.
pub const TRUST_SET_DEFAULT_LIMIT: &str = "1000000000";

/// A ledger amount: integer drops for XRP, a currency/issuer/value object
/// for issued currencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XrplAmount {
    Drops(String),
    Issued {
        currency: String,
        issuer: String,
        value: String,
    },
}

impl XrplAmount {
    /// Formats a display-unit amount for the wire: XRP becomes an integer
    /// drops string, issued currencies keep their decimal value.
    pub fn from_currency(currency: &LedgerCurrency, amount: &BigDecimal) -> Result<Self> {
        let token = Token::Ledger(currency.clone());
        if currency.is_native() {
            let drops = Balance::<Human>::new(amount.clone(), token).to_planck();
            return Ok(XrplAmount::Drops(drops.to_planck_string()));
        }
        let issuer = currency.issuer.clone().ok_or_else(|| {
            DexError::Validation("issued currency requires an issuer".to_string())
        })?;
        Ok(XrplAmount::Issued {
            currency: currency.currency.as_str().to_string(),
            issuer,
            value: Balance::<Human>::new(amount.clone(), token).to_human(),
        })
    }
}

/// A currency reference without an amount (AMMDeposit/AMMWithdraw `Asset`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XrplAsset {
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
}

impl From<&LedgerCurrency> for XrplAsset {
    fn from(c: &LedgerCurrency) -> Self {
        Self {
            currency: c.currency.as_str().to_string(),
            issuer: c.issuer.clone(),
        }
    }
}

/// A built, unsigned ledger transaction. Field names follow the XRPL wire
/// format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "TransactionType")]
pub enum XrplTx {
    Payment {
        #[serde(rename = "Account")]
        account: String,
        #[serde(rename = "Destination")]
        destination: String,
        #[serde(rename = "Amount")]
        amount: XrplAmount,
        #[serde(rename = "SendMax", skip_serializing_if = "Option::is_none")]
        send_max: Option<XrplAmount>,
        #[serde(rename = "DeliverMin", skip_serializing_if = "Option::is_none")]
        deliver_min: Option<XrplAmount>,
        #[serde(rename = "DestinationTag", skip_serializing_if = "Option::is_none")]
        destination_tag: Option<u32>,
        #[serde(rename = "Flags", skip_serializing_if = "Option::is_none")]
        flags: Option<u32>,
    },
    #[serde(rename = "AMMDeposit")]
    AmmDeposit {
        #[serde(rename = "Account")]
        account: String,
        #[serde(rename = "Asset")]
        asset: XrplAsset,
        #[serde(rename = "Asset2")]
        asset2: XrplAsset,
        #[serde(rename = "Amount")]
        amount: XrplAmount,
        #[serde(rename = "Amount2")]
        amount2: XrplAmount,
        #[serde(rename = "Flags")]
        flags: u32,
    },
    #[serde(rename = "AMMWithdraw")]
    AmmWithdraw {
        #[serde(rename = "Account")]
        account: String,
        #[serde(rename = "Asset")]
        asset: XrplAsset,
        #[serde(rename = "Asset2")]
        asset2: XrplAsset,
        #[serde(rename = "Amount")]
        amount: XrplAmount,
        #[serde(rename = "Amount2")]
        amount2: XrplAmount,
        #[serde(rename = "Flags")]
        flags: u32,
    },
    TrustSet {
        #[serde(rename = "Account")]
        account: String,
        #[serde(rename = "LimitAmount")]
        limit_amount: XrplAmount,
    },
}

/// Plain payment, with an optional destination tag for custodial receivers.
pub fn build_payment(
    account: &str,
    destination: &str,
    currency: &LedgerCurrency,
    amount: &BigDecimal,
    destination_tag: Option<u32>,
) -> Result<XrplTx> {
    Ok(XrplTx::Payment {
        account: account.to_string(),
        destination: destination.to_string(),
        amount: XrplAmount::from_currency(currency, amount)?,
        send_max: None,
        deliver_min: None,
        destination_tag,
        flags: None,
    })
}

/// The swap transaction: a partial payment to self, delivering the counter
/// currency with a slippage-adjusted floor while capping what the source
/// side may spend.
pub fn build_cross_currency_payment(
    account: &str,
    source: &LedgerCurrency,
    max_spend: &BigDecimal,
    destination: &LedgerCurrency,
    deliver: &BigDecimal,
    deliver_min: &BigDecimal,
) -> Result<XrplTx> {
    Ok(XrplTx::Payment {
        account: account.to_string(),
        destination: account.to_string(),
        amount: XrplAmount::from_currency(destination, deliver)?,
        send_max: Some(XrplAmount::from_currency(source, max_spend)?),
        deliver_min: Some(XrplAmount::from_currency(destination, deliver_min)?),
        destination_tag: None,
        flags: Some(TF_PARTIAL_PAYMENT),
    })
}

/// Proportional two-asset AMM deposit.
pub fn build_amm_deposit(
    account: &str,
    x: &LedgerCurrency,
    x_amount: &BigDecimal,
    y: &LedgerCurrency,
    y_amount: &BigDecimal,
) -> Result<XrplTx> {
    Ok(XrplTx::AmmDeposit {
        account: account.to_string(),
        asset: XrplAsset::from(x),
        asset2: XrplAsset::from(y),
        amount: XrplAmount::from_currency(x, x_amount)?,
        amount2: XrplAmount::from_currency(y, y_amount)?,
        flags: TF_TWO_ASSET,
    })
}

/// Proportional two-asset AMM withdrawal.
pub fn build_amm_withdraw(
    account: &str,
    x: &LedgerCurrency,
    x_amount: &BigDecimal,
    y: &LedgerCurrency,
    y_amount: &BigDecimal,
) -> Result<XrplTx> {
    Ok(XrplTx::AmmWithdraw {
        account: account.to_string(),
        asset: XrplAsset::from(x),
        asset2: XrplAsset::from(y),
        amount: XrplAmount::from_currency(x, x_amount)?,
        amount2: XrplAmount::from_currency(y, y_amount)?,
        flags: TF_TWO_ASSET,
    })
}

/// Opens a trustline for an issued currency.
pub fn build_trust_set(
    account: &str,
    currency: &LedgerCurrency,
    limit: Option<&BigDecimal>,
) -> Result<XrplTx> {
    let limit = match limit {
        Some(l) => l.clone(),
        None => TRUST_SET_DEFAULT_LIMIT
            .parse()
            .map_err(|_| DexError::Unknown("bad default trust limit".to_string()))?,
    };
    if currency.is_native() {
        return Err(DexError::Validation(
            "XRP does not use trustlines".to_string(),
        ));
    }
    Ok(XrplTx::TrustSet {
        account: account.to_string(),
        limit_amount: XrplAmount::from_currency(currency, &limit)?,
    })
}

/// Gate for issued-currency sends: the account must already hold a
/// trustline for the currency. Native XRP always passes.
pub fn require_trustline(balances: &[LedgerBalance], currency: &LedgerCurrency) -> Result<()> {
    if currency.is_native() {
        return Ok(());
    }
    let found = balances.iter().any(|line| {
        line.currency.eq_ignore_ascii_case(currency.currency.as_str())
            && line.issuer == currency.issuer
    });
    if found {
        Ok(())
    } else {
        Err(DexError::Validation(format!(
            "no trustline for {}",
            currency.currency.display_code()
        )))
    }
}

/// Hash-derived explorer link for a validated transaction.
pub fn explorer_url(hash: &str) -> String {
    format!("{XRPL_EXPLORER_URL}/{hash}")
}
